use crate::mode::cursor::LineCursor;
use crate::mode::delegate::{ActiveDelegate, DelegateState, LanguageProvider, PlainDelegate};
use crate::mode::graph::{ModeGraph, ModeId};
use crate::mode::pattern::{Pattern, match_patterns};
use crate::mode::state::State;
use crate::mode::steps::{StepAction, StepContext};
use std::sync::Arc;

/// Upper bound on zero-width transitions (pops and entries) inside a single token.
const MAX_RESCANS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One token produced by [`Tokenizer::token`].
pub struct Token {
    /// Space separated style names, or `None` for unstyled text.
    pub style: Option<String>,
    /// Number of bytes consumed. Only zero when the cursor was already at the end of the line.
    pub len: usize,
}

impl Token {
    fn from_cursor(style: Option<String>, cursor: &LineCursor<'_>) -> Self {
        Self {
            style,
            len: cursor.pos() - cursor.token_start(),
        }
    }
}

enum Scan {
    /// Input was consumed; this is the composed style.
    Token(Option<String>),
    /// A zero-width transition happened; scan again at the same position.
    Rescan,
    /// Nothing matched.
    Nothing,
}

/// Drives the mode graph over lines of text.
///
/// A tokenizer is immutable and may be shared between threads; all per-session data lives in
/// [`State`].
#[derive(Debug, Clone)]
pub struct Tokenizer {
    graph: Arc<ModeGraph>,
    languages: Arc<dyn LanguageProvider>,
}

impl Tokenizer {
    /// Create a tokenizer over `graph`, resolving embedded languages through `languages`.
    pub fn new(graph: Arc<ModeGraph>, languages: Arc<dyn LanguageProvider>) -> Self {
        Self { graph, languages }
    }

    /// The mode graph.
    pub fn graph(&self) -> &ModeGraph {
        &self.graph
    }

    /// The embedded language provider.
    pub fn languages(&self) -> &dyn LanguageProvider {
        self.languages.as_ref()
    }

    /// A fresh state positioned in the base mode.
    pub fn start_state(&self) -> State {
        State::new(self.graph.base())
    }

    /// Consume one token from `cursor`.
    ///
    /// Always consumes at least one character unless the cursor is already at the end of the
    /// line.
    pub fn token(&self, state: &mut State, cursor: &mut LineCursor<'_>) -> Token {
        cursor.begin_token();
        if cursor.is_at_end_of_line() {
            return Token::from_cursor(None, cursor);
        }

        for _ in 0..MAX_RESCANS {
            match self.scan(state, cursor) {
                Scan::Token(style) => return Token::from_cursor(style, cursor),
                Scan::Rescan => continue,
                Scan::Nothing => break,
            }
        }

        if state.delegate().is_some() {
            return self.step_delegate(state, cursor);
        }

        cursor.next_char();
        Token::from_cursor(self.compose(state, None), cursor)
    }

    /// Handle an empty line.
    ///
    /// Modes with a bare start-of-line exit end here; otherwise the event goes to the active
    /// delegate.
    pub fn blank_line(&self, state: &mut State) -> Option<String> {
        if state.is_exit_pending() {
            state.exit(&self.graph);
        }

        if self.graph.mode(state.current()).exits_on_blank_line() {
            state.set_pending_exit();
            return None;
        }

        state
            .delegate_mut()
            .and_then(|delegate| delegate.state_mut().blank_line())
    }

    /// Indentation hint from the active delegate.
    pub fn indent(&self, state: &State, text_after: &str) -> Option<usize> {
        state
            .delegate()
            .and_then(|delegate| delegate.state().indent(text_after))
    }

    /// Name of the embedded language currently receiving content.
    pub fn inner_language<'s>(&self, state: &'s State) -> Option<&'s str> {
        state.delegate().and_then(ActiveDelegate::language)
    }

    fn scan(&self, state: &mut State, cursor: &mut LineCursor<'_>) -> Scan {
        let graph = self.graph.as_ref();
        if state.is_exit_pending() {
            state.exit(graph);
        }

        let current = state.current();
        let start = cursor.pos();

        for &candidate in state.allowed(graph).iter() {
            let mode = graph.mode(candidate);

            if candidate != current {
                if let Some(pattern) = match_patterns(&mode.entries, cursor) {
                    self.enter(state, candidate, pattern);
                    if cursor.pos() > start {
                        return Scan::Token(self.compose(state, pattern.style.as_deref()));
                    }
                    return Scan::Rescan;
                }
                continue;
            }

            if let Some(step) = mode.step {
                let delegate_active = state.delegate().is_some();
                let outcome = step.run(
                    cursor,
                    StepContext {
                        scratch: state.scratch_mut(),
                        languages: self.languages.as_ref(),
                        matchers: graph.step_matchers(),
                        delegate_active,
                    },
                );
                let consumed = cursor.pos() > start;
                match outcome.action {
                    StepAction::Stay if consumed => {
                        return Scan::Token(self.compose(state, outcome.style));
                    }
                    StepAction::Stay => {}
                    StepAction::Pop => {
                        state.pop(graph);
                        if consumed {
                            return Scan::Token(self.compose(state, outcome.style));
                        }
                        return Scan::Rescan;
                    }
                    StepAction::EnterDelegate(language) => {
                        let style = self.compose(state, outcome.style);
                        self.start_delegate(state, language);
                        if consumed {
                            return Scan::Token(style);
                        }
                        return Scan::Rescan;
                    }
                }
            }

            if let Some(pattern) = match_patterns(&mode.patterns, cursor) {
                let consumed = cursor.pos() > start;
                if pattern.exit {
                    if !consumed {
                        state.exit(graph);
                        return Scan::Rescan;
                    }
                    let style = self.compose(state, pattern.style.as_deref());
                    state.set_pending_exit();
                    return Scan::Token(style);
                }
                if consumed {
                    return Scan::Token(self.compose(state, pattern.style.as_deref()));
                }
            }
        }

        Scan::Nothing
    }

    fn enter(&self, state: &mut State, candidate: ModeId, pattern: &Pattern) {
        state.push(candidate);
        if let Some(language) = &pattern.language {
            self.start_delegate(state, Some(language.clone()));
        }
        if let Some(template) = pattern.push {
            let allowed: Arc<[ModeId]> = std::iter::once(template)
                .chain(self.graph.allowed(candidate).iter().copied())
                .collect();
            state.push_derived(template, allowed);
        }
        if pattern.exit {
            state.set_pending_exit();
        }
    }

    fn start_delegate(&self, state: &mut State, language: Option<String>) {
        let delegate: Box<dyn DelegateState> = match language.as_deref() {
            Some(name) => self.languages.start_state(name).unwrap_or_else(|| {
                log::trace!("no tokenizer for embedded language {name:?}, using plain text");
                Box::new(PlainDelegate)
            }),
            None => Box::new(PlainDelegate),
        };
        state.set_delegate(ActiveDelegate::new(language, delegate));
    }

    fn step_delegate(&self, state: &mut State, cursor: &mut LineCursor<'_>) -> Token {
        let start = cursor.pos();
        if let Some(horizon) = self.exit_horizon(state, cursor) {
            cursor.set_limit(horizon);
        }

        let style = state
            .delegate_mut()
            .and_then(|delegate| delegate.state_mut().step(cursor));
        cursor.clear_limit();

        if cursor.pos() == start {
            cursor.next_char();
        }
        Token::from_cursor(style, cursor)
    }

    /// Earliest offset past the cursor where a continuation pattern of the current mode could
    /// match. The delegate must not consume beyond it.
    fn exit_horizon(&self, state: &State, cursor: &LineCursor<'_>) -> Option<usize> {
        let from = cursor.pos() + cursor.peek().map_or(0, char::len_utf8);
        self.graph
            .mode(state.current())
            .patterns
            .iter()
            .filter_map(|p| p.horizon(cursor.line(), from))
            .min()
    }

    /// Join the styles of every mode on the stack (outermost first) and `style`.
    fn compose(&self, state: &State, style: Option<&str>) -> Option<String> {
        let mut styles: Vec<&str> = state
            .modes()
            .filter_map(|id| self.graph.mode(id).style.as_deref())
            .collect();
        styles.extend(style);
        if styles.is_empty() {
            None
        } else {
            Some(styles.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::definition::{ModeDefinition, ModeType, PatternDefinition};
    use crate::mode::delegate::NoLanguages;
    use crate::mode::registry::RegistryBuilder;

    fn tokenizer(builder: RegistryBuilder) -> Tokenizer {
        let graph = ModeGraph::build(builder.build().unwrap()).unwrap();
        Tokenizer::new(Arc::new(graph), Arc::new(NoLanguages))
    }

    fn tokens(tokenizer: &Tokenizer, state: &mut State, line: &str) -> Vec<(String, Option<String>)> {
        let mut cursor = LineCursor::new(line);
        let mut out = Vec::new();
        while !cursor.is_at_end_of_line() {
            let token = tokenizer.token(state, &mut cursor);
            assert!(token.len > 0);
            out.push((cursor.current().to_string(), token.style));
        }
        out
    }

    fn base(child: ModeType) -> ModeDefinition {
        ModeDefinition::new("base", 0).allows([child])
    }

    #[test]
    fn test_exit_token_keeps_mode_style() {
        let t = tokenizer(
            RegistryBuilder::new().mode(base(ModeType::Formatting)).mode(
                ModeDefinition::new("strong", 70)
                    .kind(ModeType::Formatting)
                    .allows([ModeType::Formatting])
                    .entry(PatternDefinition::literal("**"))
                    .pattern(PatternDefinition::literal("**").exit())
                    .style("strong"),
            ),
        );
        let mut state = t.start_state();
        let out = tokens(&t, &mut state, "**a**b");
        let strong = Some("strong".to_string());
        assert_eq!(
            out,
            [
                ("**".to_string(), strong.clone()),
                ("a".to_string(), strong.clone()),
                ("**".to_string(), strong),
                ("b".to_string(), None),
            ]
        );
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_zero_width_exit_rescans_in_parent() {
        let t = tokenizer(
            RegistryBuilder::new().mode(base(ModeType::Container)).mode(
                ModeDefinition::new("quote", 220)
                    .kind(ModeType::Container)
                    .allows([ModeType::Container])
                    .entry(PatternDefinition::regex(">+").at_line_start().style("def"))
                    .pattern(PatternDefinition::regex(">+").at_line_start().style("def"))
                    .pattern(PatternDefinition::line_start_exit()),
            ),
        );
        let mut state = t.start_state();
        tokens(&t, &mut state, ">> a");
        assert_eq!(state.depth(), 2);

        let out = tokens(&t, &mut state, "b");
        assert_eq!(out, [("b".to_string(), None)]);
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_blank_line_ends_line_start_modes() {
        let t = tokenizer(
            RegistryBuilder::new().mode(base(ModeType::Protected)).mode(
                ModeDefinition::new("pre", 20)
                    .kind(ModeType::Protected)
                    .entry(PatternDefinition::literal("  ").at_line_start())
                    .pattern(PatternDefinition::line_start_exit())
                    .style("string"),
            ),
        );
        let mut state = t.start_state();
        tokens(&t, &mut state, "  x");
        assert_eq!(t.blank_line(&mut state), None);
        assert!(state.is_exit_pending());
        assert_eq!(tokens(&t, &mut state, "y"), [("y".to_string(), None)]);
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let t = tokenizer(
            RegistryBuilder::new().mode(base(ModeType::Protected)).mode(
                ModeDefinition::new("php", 180)
                    .kind(ModeType::Protected)
                    .entry(PatternDefinition::literal("<php>").style("tag").lang("php"))
                    .pattern(PatternDefinition::literal("</php>").style("tag").exit()),
            ),
        );
        let mut state = t.start_state();
        let out = tokens(&t, &mut state, "<php>echo 1;");
        assert_eq!(
            out,
            [
                ("<php>".to_string(), Some("tag".to_string())),
                ("echo 1;".to_string(), None),
            ]
        );
        assert_eq!(t.inner_language(&state), Some("php"));

        let out = tokens(&t, &mut state, "x;</php>!");
        assert_eq!(
            out,
            [
                ("x;".to_string(), None),
                ("</php>".to_string(), Some("tag".to_string())),
                ("!".to_string(), None),
            ]
        );
        assert_eq!(t.inner_language(&state), None);
    }
}
