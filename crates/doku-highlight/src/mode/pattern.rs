use crate::mode::cursor::LineCursor;
use crate::mode::error::ModeError;
use crate::mode::graph::ModeId;
use onig::{Regex, RegexOptions, SearchOptions, Syntax};
use std::sync::Arc;

#[derive(Debug, Clone)]
/// What a [`Pattern`] matches at the cursor.
pub enum Matcher {
    /// Matches without consuming anything (bare start-of-line exits).
    Empty,
    /// Literal text.
    Literal(String),
    /// A regex anchored at the cursor.
    Regex(Arc<Regex>),
}

impl Matcher {
    /// Whether this matcher never consumes input.
    pub fn is_empty(&self) -> bool {
        matches!(self, Matcher::Empty)
    }

    fn match_at(&self, cursor: &mut LineCursor<'_>) -> bool {
        match self {
            Matcher::Empty => true,
            Matcher::Literal(text) => cursor.match_literal(text),
            Matcher::Regex(regex) => cursor.match_regex(regex),
        }
    }

    /// Earliest offset at or after `from` where this matcher could match in `text`.
    fn find_from(&self, text: &str, from: usize) -> Option<usize> {
        match self {
            Matcher::Empty => None,
            Matcher::Literal(lit) => text[from..].find(lit.as_str()).map(|i| from + i),
            Matcher::Regex(regex) => regex.search_with_options(
                text,
                from,
                text.len(),
                SearchOptions::SEARCH_OPTION_NONE,
                None,
            ),
        }
    }
}

#[derive(Debug, Clone)]
/// A compiled entry or continuation pattern.
pub struct Pattern {
    /// What to match at the cursor.
    pub matcher: Matcher,
    /// Only match when the cursor is at line offset zero.
    pub start_of_line: bool,
    /// Must be found in the text left of the cursor for the pattern to apply.
    pub lookbehind: Option<Arc<Regex>>,
    /// Matching ends the owning mode.
    pub exit: bool,
    /// Style appended to the composed mode styles.
    pub style: Option<String>,
    /// Embedded language started on entry.
    pub language: Option<String>,
    /// Push template activated on entry.
    pub push: Option<ModeId>,
}

impl Pattern {
    /// Whether this is a bare start-of-line exit (matches empty lines too).
    pub fn is_line_start_exit(&self) -> bool {
        self.start_of_line && self.exit && self.matcher.is_empty()
    }

    /// Try to match at the cursor, checking the line-start and lookbehind constraints first.
    ///
    /// On success the cursor is advanced past the match.
    pub fn try_match(&self, cursor: &mut LineCursor<'_>) -> bool {
        if self.start_of_line && !cursor.is_at_start_of_line() {
            return false;
        }
        if let Some(behind) = &self.lookbehind
            && behind.find(cursor.text_before_cursor()).is_none()
        {
            return false;
        }
        self.matcher.match_at(cursor)
    }

    /// Earliest offset at or after `from` where this pattern might match on `line`.
    ///
    /// Lookbehind is not evaluated, so the result may be early but never late.
    pub fn horizon(&self, line: &str, from: usize) -> Option<usize> {
        if self.start_of_line && from > 0 {
            return None;
        }
        self.matcher.find_from(line, from)
    }
}

/// Return the first pattern in `patterns` matching at the cursor.
pub fn match_patterns<'p>(patterns: &'p [Pattern], cursor: &mut LineCursor<'_>) -> Option<&'p Pattern> {
    patterns.iter().find(|p| p.try_match(cursor))
}

/// Compile `source` with the syntax used for all mode patterns.
pub fn compile_regex(source: &str, ignore_case: bool) -> Result<Regex, ModeError> {
    let options = if ignore_case {
        RegexOptions::REGEX_OPTION_IGNORECASE
    } else {
        RegexOptions::REGEX_OPTION_NONE
    };
    Regex::with_options(source, options, Syntax::default()).map_err(|e| ModeError::RegexCompile {
        pattern: source.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(matcher: Matcher) -> Pattern {
        Pattern {
            matcher,
            start_of_line: false,
            lookbehind: None,
            exit: false,
            style: None,
            language: None,
            push: None,
        }
    }

    #[test]
    fn test_start_of_line_constraint() {
        let mut p = pattern(Matcher::Literal("  ".to_string()));
        p.start_of_line = true;

        let mut cursor = LineCursor::new("    x");
        assert!(p.try_match(&mut cursor));
        assert_eq!(cursor.pos(), 2);
        assert!(!p.try_match(&mut cursor));
        assert_eq!(cursor.pos(), 2);
    }

    #[test]
    fn test_lookbehind_blocks_mid_word_match() {
        let mut p = pattern(Matcher::Regex(Arc::new(compile_regex("FAQ", false).unwrap())));
        p.lookbehind = Some(Arc::new(compile_regex(r"\B$", false).unwrap()));

        let mut cursor = LineCursor::new("xFAQ FAQ");
        cursor.next_char();
        assert!(!p.try_match(&mut cursor));

        let mut cursor = LineCursor::new("xFAQ FAQ");
        cursor.advance_to(5);
        assert!(p.try_match(&mut cursor));
        assert!(cursor.is_at_end_of_line());
    }

    #[test]
    fn test_empty_matcher_is_zero_width() {
        let mut p = pattern(Matcher::Empty);
        p.start_of_line = true;
        p.exit = true;
        assert!(p.is_line_start_exit());

        let mut cursor = LineCursor::new("text");
        assert!(p.try_match(&mut cursor));
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_horizon_finds_next_literal() {
        let p = pattern(Matcher::Literal("</php>".to_string()));
        assert_eq!(p.horizon("echo 1; </php> x", 0), Some(8));
        assert_eq!(p.horizon("echo 1; </php> x", 9), None);
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let err = compile_regex("(unclosed", false).unwrap_err();
        assert!(matches!(err, ModeError::RegexCompile { .. }));
    }
}
