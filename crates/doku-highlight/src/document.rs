//! Whole-document helpers on top of [`Tokenizer`].

use crate::mode::{LineCursor, State, Tokenizer};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A styled byte range on one line.
pub struct StyledSpan {
    /// Zero-based line number.
    pub line: usize,
    /// Start byte offset within the line.
    pub start: usize,
    /// End byte offset within the line (exclusive).
    pub end: usize,
    /// Space separated style names.
    pub style: String,
}

/// Tokenize `text` from the start state.
///
/// Unstyled text produces no span; adjacent tokens with the same style are merged.
pub fn highlight_text(tokenizer: &Tokenizer, text: &str) -> Vec<StyledSpan> {
    let mut state = tokenizer.start_state();
    let mut spans = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        highlight_line(tokenizer, &mut state, line_no, line, &mut spans);
    }
    spans
}

/// Tokenize one line, appending its spans to `spans`.
///
/// `line` must not contain the line terminator. Empty lines go through
/// [`Tokenizer::blank_line`].
pub fn highlight_line(
    tokenizer: &Tokenizer,
    state: &mut State,
    line_no: usize,
    line: &str,
    spans: &mut Vec<StyledSpan>,
) {
    if line.is_empty() {
        tokenizer.blank_line(state);
        return;
    }

    let mut cursor = LineCursor::new(line);
    while !cursor.is_at_end_of_line() {
        let token = tokenizer.token(state, &mut cursor);
        if let Some(style) = token.style {
            emit_span(spans, line_no, cursor.token_start(), cursor.pos(), style);
        }
    }
}

fn emit_span(spans: &mut Vec<StyledSpan>, line: usize, start: usize, end: usize, style: String) {
    if start >= end {
        return;
    }

    if let Some(last) = spans.last_mut()
        && last.line == line
        && last.end == start
        && last.style == style
    {
        last.end = end;
        return;
    }

    spans.push(StyledSpan {
        line,
        start,
        end,
        style,
    });
}

/// Cached start-of-line states for incremental re-highlighting.
///
/// The state before line `n` only depends on lines `0..n`, so after an edit on line `n` the
/// host calls [`LineStates::invalidate_from`] with `n` and re-highlights the visible lines.
#[derive(Debug, Clone)]
pub struct LineStates {
    tokenizer: Tokenizer,
    /// `states[n]` is the state before line `n`.
    states: Vec<State>,
}

impl LineStates {
    /// Create an empty cache.
    pub fn new(tokenizer: Tokenizer) -> Self {
        let start = tokenizer.start_state();
        Self {
            tokenizer,
            states: vec![start],
        }
    }

    /// The tokenizer used to fill the cache.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Number of lines whose start state is cached.
    pub fn cached_lines(&self) -> usize {
        self.states.len()
    }

    /// Forget every state after line `line` (line `line` itself stays valid).
    pub fn invalidate_from(&mut self, line: usize) {
        self.states.truncate(line + 1);
    }

    /// The state before line `line`, tokenizing any uncached lines in between.
    ///
    /// `line` is clamped to `lines.len()`.
    pub fn state_before<S: AsRef<str>>(&mut self, lines: &[S], line: usize) -> State {
        let line = line.min(lines.len());
        let mut scratch = Vec::new();
        while self.states.len() <= line {
            let line_no = self.states.len() - 1;
            let mut state = self.states[line_no].clone();
            highlight_line(
                &self.tokenizer,
                &mut state,
                line_no,
                lines[line_no].as_ref(),
                &mut scratch,
            );
            scratch.clear();
            self.states.push(state);
        }
        self.states[line].clone()
    }

    /// Highlight line `line` of `lines`, caching the state after it.
    pub fn highlight_line<S: AsRef<str>>(&mut self, lines: &[S], line: usize) -> Vec<StyledSpan> {
        let Some(text) = lines.get(line) else {
            return Vec::new();
        };

        let mut state = self.state_before(lines, line);
        let mut spans = Vec::new();
        highlight_line(&self.tokenizer, &mut state, line, text.as_ref(), &mut spans);
        if self.states.len() == line + 1 {
            self.states.push(state);
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightConfig;
    use crate::mode::NoLanguages;
    use std::sync::Arc;

    fn tokenizer() -> Tokenizer {
        HighlightConfig::default()
            .tokenizer(Arc::new(NoLanguages))
            .unwrap()
    }

    fn span(line: usize, start: usize, end: usize, style: &str) -> StyledSpan {
        StyledSpan {
            line,
            start,
            end,
            style: style.to_string(),
        }
    }

    #[test]
    fn test_highlight_text_merges_spans() {
        let spans = highlight_text(&tokenizer(), "a **bold** b\n\n== H ==");
        assert_eq!(spans, [span(0, 2, 10, "strong"), span(2, 0, 7, "header")]);
    }

    #[test]
    fn test_line_states_rehighlight_after_edit() {
        let mut cache = LineStates::new(tokenizer());
        let mut lines = vec!["<nowiki>", "**x**", "</nowiki>", "**y**"];

        assert!(cache.highlight_line(&lines, 1).is_empty());
        assert_eq!(cache.highlight_line(&lines, 3), [span(3, 0, 5, "strong")]);
        assert_eq!(cache.cached_lines(), 5);

        lines[0] = "plain";
        cache.invalidate_from(0);
        assert_eq!(cache.cached_lines(), 1);
        assert_eq!(cache.highlight_line(&lines, 1), [span(1, 0, 5, "strong")]);
        assert_eq!(cache.state_before(&lines, 3).depth(), 1);
    }
}
