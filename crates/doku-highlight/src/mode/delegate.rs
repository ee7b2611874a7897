//! Embedded sub-language delegation.
//!
//! Protected modes such as `<code java>` or `<php>` hand their content to a third-party
//! tokenizer. The engine only sees that tokenizer through [`DelegateState`]; a
//! [`LanguageProvider`] creates the per-session states by language name.

use crate::mode::cursor::LineCursor;
use std::fmt;

/// Per-session state of an embedded language tokenizer.
///
/// Implementations must be cheap to clone: the host clones tokenizer states for lookahead and
/// line checkpoints.
pub trait DelegateState: fmt::Debug + Send {
    /// Consume one token from `cursor` and return its style.
    ///
    /// The cursor may be limited so that the owning mode's exit pattern stays out of view.
    /// Consuming nothing is allowed; the engine then advances one character itself.
    fn step(&mut self, cursor: &mut LineCursor<'_>) -> Option<String>;

    /// Called for an empty line while this delegate is active.
    fn blank_line(&mut self) -> Option<String> {
        None
    }

    /// Suggested indentation for a line starting with `text_after`, if the language has one.
    fn indent(&self, _text_after: &str) -> Option<usize> {
        None
    }

    /// Clone into a new box.
    fn box_clone(&self) -> Box<dyn DelegateState>;
}

impl Clone for Box<dyn DelegateState> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Looks up embedded language tokenizers by name.
pub trait LanguageProvider: fmt::Debug + Send + Sync {
    /// Whether `name` is a recognized language (used to style `<code name>` parameters).
    fn is_known(&self, name: &str) -> bool;

    /// Create a fresh state for `name`, or `None` if the language is not available.
    fn start_state(&self, name: &str) -> Option<Box<dyn DelegateState>>;
}

/// A provider that knows no languages; every delegate degrades to [`PlainDelegate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLanguages;

impl LanguageProvider for NoLanguages {
    fn is_known(&self, _name: &str) -> bool {
        false
    }

    fn start_state(&self, _name: &str) -> Option<Box<dyn DelegateState>> {
        None
    }
}

/// Fallback delegate for unknown or missing languages: unstyled text up to the visible end.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainDelegate;

impl DelegateState for PlainDelegate {
    fn step(&mut self, cursor: &mut LineCursor<'_>) -> Option<String> {
        cursor.skip_to_end();
        None
    }

    fn box_clone(&self) -> Box<dyn DelegateState> {
        Box::new(*self)
    }
}

#[derive(Debug, Clone)]
/// The delegate currently receiving a mode's content.
pub struct ActiveDelegate {
    language: Option<String>,
    state: Box<dyn DelegateState>,
}

impl ActiveDelegate {
    pub(crate) fn new(language: Option<String>, state: Box<dyn DelegateState>) -> Self {
        Self { language, state }
    }

    /// Language name the delegate was requested for (`None` for `<code>` without one).
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// The delegate's own state.
    pub fn state(&self) -> &dyn DelegateState {
        self.state.as_ref()
    }

    pub(crate) fn state_mut(&mut self) -> &mut dyn DelegateState {
        self.state.as_mut()
    }
}
