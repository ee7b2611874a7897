#![warn(missing_docs)]
//! `doku-highlight` - a priority-ordered lexical mode engine for DokuWiki markup.
//!
//! The crate turns a table of lexical modes (with entry/exit patterns, type tags and
//! priorities) into an immutable mode graph, then tokenizes text line by line with a
//! cloneable per-session state. Embedded languages (`<code java>`, `<php>`, ...) are handed to
//! pluggable delegates.
//!
//! ```
//! use doku_highlight::{HighlightConfig, NoLanguages, highlight_text};
//! use std::sync::Arc;
//!
//! let tokenizer = HighlightConfig::default().tokenizer(Arc::new(NoLanguages)).unwrap();
//! let spans = highlight_text(&tokenizer, "**bold**");
//! assert_eq!(spans[0].style, "strong");
//! ```

pub mod config;
pub mod document;
pub mod mode;
pub mod rules;

pub use config::{DEFAULT_SCHEMES, HighlightConfig};
pub use document::{LineStates, StyledSpan, highlight_line, highlight_text};
pub use mode::*;
