use crate::mode::definition::{CustomStep, ModeDefinition, ModeType, PatternDefinition};
use crate::mode::error::ModeError;
use crate::mode::graph::ModeId;
use crate::mode::pattern::{Matcher, Pattern, compile_regex};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
/// A compiled, immutable lexical mode.
///
/// This is the runtime representation consumed by the tokenizer.
pub struct Mode {
    /// Position of this mode in its registry.
    pub id: ModeId,
    /// Human-readable name.
    pub name: String,
    /// Registration priority.
    pub priority: i32,
    /// Category tag (`None` for the base mode and push templates without one).
    pub kind: Option<ModeType>,
    /// Permitted child types. `None` marks a leaf (terminal content) mode.
    pub allows: Option<Vec<ModeType>>,
    /// Patterns entering this mode.
    pub entries: Vec<Pattern>,
    /// Patterns tried while this mode is active.
    pub patterns: Vec<Pattern>,
    /// Style contributed by this mode to every token produced beneath it.
    pub style: Option<String>,
    /// Custom step overriding pattern matching.
    pub step: Option<CustomStep>,
}

impl Mode {
    /// Whether the mode has no permitted child types.
    pub fn is_leaf(&self) -> bool {
        self.allows.is_none()
    }

    /// Whether the mode permits children of type `kind`.
    pub fn permits(&self, kind: ModeType) -> bool {
        self.allows.as_ref().is_some_and(|a| a.contains(&kind))
    }

    /// Whether a blank line ends this mode.
    pub fn exits_on_blank_line(&self) -> bool {
        self.patterns.iter().any(Pattern::is_line_start_exit)
    }
}

/// Compile a mode definition.
///
/// `templates` maps push template names to their ids.
pub(crate) fn compile_mode(
    id: ModeId,
    definition: &ModeDefinition,
    templates: &HashMap<String, ModeId>,
) -> Result<Mode, ModeError> {
    let entries = definition
        .entries
        .iter()
        .map(|p| compile_pattern(p, &definition.name, templates))
        .collect::<Result<Vec<_>, _>>()?;
    let patterns = definition
        .patterns
        .iter()
        .map(|p| compile_pattern(p, &definition.name, templates))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Mode {
        id,
        name: definition.name.clone(),
        priority: definition.priority,
        kind: definition.kind,
        allows: definition.allows.clone(),
        entries,
        patterns,
        style: definition.style.clone(),
        step: definition.step,
    })
}

fn compile_pattern(
    pattern: &PatternDefinition,
    mode: &str,
    templates: &HashMap<String, ModeId>,
) -> Result<Pattern, ModeError> {
    let invalid = |reason| ModeError::InvalidPattern {
        mode: mode.to_string(),
        reason,
    };

    let matcher = match (&pattern.literal, &pattern.regex) {
        (Some(_), Some(_)) => return Err(invalid("both `literal` and `regex` are set")),
        (Some(text), None) if text.is_empty() => return Err(invalid("empty literal")),
        (Some(text), None) => Matcher::Literal(text.clone()),
        (None, Some(source)) => {
            Matcher::Regex(Arc::new(compile_regex(source, pattern.ignore_case)?))
        }
        (None, None) if pattern.sol && pattern.exit => Matcher::Empty,
        (None, None) => {
            return Err(invalid(
                "a pattern without `literal` or `regex` must be a start-of-line exit",
            ));
        }
    };

    let lookbehind = pattern
        .behind
        .as_deref()
        .map(|source| compile_regex(source, false).map(Arc::new))
        .transpose()?;

    let push = match &pattern.push {
        None => None,
        Some(name) => Some(*templates.get(name).ok_or_else(|| ModeError::UnknownTemplate {
            mode: mode.to_string(),
            template: name.clone(),
        })?),
    };

    Ok(Pattern {
        matcher,
        start_of_line: pattern.sol,
        lookbehind,
        exit: pattern.exit,
        style: pattern.style.clone(),
        language: pattern.lang.clone(),
        push,
    })
}
