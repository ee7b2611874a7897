use onig::{Regex, SearchOptions};

/// A cursor over a single line of text, advanced one token at a time.
///
/// Offsets are byte offsets into the line and always sit on UTF-8 character boundaries.
/// The cursor may be limited to a prefix of the line (see [`LineCursor::limit`]); matching never
/// looks past the limit, but lookbehind tests still see everything left of the cursor.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    line: &'a str,
    pos: usize,
    start: usize,
    end: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor at the start of `line`.
    ///
    /// `line` must not contain the line terminator.
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            start: 0,
            end: line.len(),
        }
    }

    /// The full line text.
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// The visible part of the line (up to the current limit).
    pub fn view(&self) -> &'a str {
        &self.line[..self.end]
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Byte offset where the current token started.
    pub fn token_start(&self) -> usize {
        self.start
    }

    /// Current limit (exclusive byte offset).
    pub fn limit(&self) -> usize {
        self.end
    }

    /// Restrict matching to `line[..end]`. Values outside `pos..=line.len()` are clamped.
    pub fn set_limit(&mut self, end: usize) {
        let mut end = end.clamp(self.pos, self.line.len());
        while !self.line.is_char_boundary(end) {
            end += 1;
        }
        self.end = end;
    }

    /// Remove any limit set by [`LineCursor::set_limit`].
    pub fn clear_limit(&mut self) {
        self.end = self.line.len();
    }

    /// Mark the current position as the start of a new token.
    pub fn begin_token(&mut self) {
        self.start = self.pos;
    }

    /// Text consumed since [`LineCursor::begin_token`].
    pub fn current(&self) -> &'a str {
        &self.line[self.start..self.pos]
    }

    /// Text left of the cursor on this line.
    pub fn text_before_cursor(&self) -> &'a str {
        &self.line[..self.pos]
    }

    /// Text between the cursor and the limit.
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..self.end]
    }

    /// Whether the cursor is at line offset zero.
    pub fn is_at_start_of_line(&self) -> bool {
        self.pos == 0
    }

    /// Whether nothing is left to consume (before the limit).
    pub fn is_at_end_of_line(&self) -> bool {
        self.pos >= self.end
    }

    /// Look at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume one character.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume `text` if the remaining input starts with it.
    pub fn match_literal(&mut self, text: &str) -> bool {
        if text.is_empty() || !self.rest().starts_with(text) {
            return false;
        }
        self.pos += text.len();
        true
    }

    /// Consume a match of `regex` if it matches exactly at the cursor.
    ///
    /// Zero-width matches succeed without consuming anything.
    pub fn match_regex(&mut self, regex: &Regex) -> bool {
        match regex.match_with_options(self.view(), self.pos, SearchOptions::SEARCH_OPTION_NONE, None)
        {
            Some(len) => {
                self.pos += len;
                true
            }
            None => false,
        }
    }

    /// Test whether `regex` matches at the cursor without consuming anything.
    pub fn looking_at(&self, regex: &Regex) -> bool {
        regex
            .match_with_options(self.view(), self.pos, SearchOptions::SEARCH_OPTION_NONE, None)
            .is_some()
    }

    /// Consume characters while `pred` holds. Returns whether anything was consumed.
    pub fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) -> bool {
        let before = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.pos > before
    }

    /// Move the cursor forward to `pos` (clamped to the limit, rounded to a char boundary).
    ///
    /// Moving backwards is ignored.
    pub fn advance_to(&mut self, pos: usize) {
        let mut pos = pos.clamp(self.pos, self.end);
        while !self.line.is_char_boundary(pos) {
            pos += 1;
        }
        self.pos = pos;
    }

    /// Consume the rest of the visible line.
    pub fn skip_to_end(&mut self) {
        self.pos = self.end;
    }
}
