//! Priority-ordered lexical mode engine.
//!
//! Modes are declared as [`ModeDefinition`]s, collected by a [`RegistryBuilder`], compiled into
//! an immutable [`ModeRegistry`] and connected into a [`ModeGraph`]. A [`Tokenizer`] walks the
//! graph one token at a time, keeping all per-session data in a cloneable [`State`].

mod compiler;
mod cursor;
mod definition;
mod delegate;
mod engine;
mod error;
mod graph;
mod pattern;
mod registry;
mod state;
mod steps;

pub use compiler::Mode;
pub use cursor::LineCursor;
pub use definition::{CustomStep, ModeDefinition, ModeType, PatternDefinition};
pub use delegate::{ActiveDelegate, DelegateState, LanguageProvider, NoLanguages, PlainDelegate};
pub use engine::{Token, Tokenizer};
pub use error::ModeError;
pub use graph::{ModeGraph, ModeId};
pub use pattern::{Matcher, Pattern, compile_regex, match_patterns};
pub use registry::{ModeRegistry, RegistryBuilder};
pub use state::{Scratch, ScratchFlag, State};
