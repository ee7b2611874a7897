use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Category tag controlling which modes may nest inside which.
pub enum ModeType {
    /// Block containers (lists, tables, quotes, rules).
    Container,
    /// Constructs only allowed at the top level (headers).
    #[serde(alias = "baseonly")]
    BaseOnly,
    /// Inline formatting (bold, italic, footnotes, ...).
    Formatting,
    /// Substitutions (links, smileys, entities, macros).
    #[serde(alias = "substition")]
    Substitution,
    /// Protected regions whose content is not wiki-parsed (code, raw html).
    Protected,
    /// Regions with wiki parsing disabled (`<nowiki>`, `%%`).
    Disabled,
}

impl ModeType {
    /// Every type tag, in declaration order.
    pub const ALL: [ModeType; 6] = [
        ModeType::Container,
        ModeType::BaseOnly,
        ModeType::Formatting,
        ModeType::Substitution,
        ModeType::Protected,
        ModeType::Disabled,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
/// A hand-written step that replaces pattern matching for the mode that carries it.
///
/// The step runs before the mode's continuation patterns; when it consumes input its style
/// is returned immediately.
pub enum CustomStep {
    /// `<code lang file>` / `<file lang file>` parameters, then the language delegate.
    CodeBlock,
    /// `[[target|title]]`
    InternalLink,
    /// `{{media?params|title}}`
    Media,
    /// `[{{media?params|title}}]` (imagebox plugin).
    ImageBox,
    /// `~~REDIRECT>target~~`
    RedirectOld,
    /// `#REDIRECT target` up to the end of the line.
    RedirectNew,
    /// `{{page>id&flags}}` (include plugin).
    Include,
    /// `<tag attr="v">` attribute list, closed by `>`.
    Attributes,
    /// Attribute list that also accepts `[name=value]` extended attributes.
    ExtendedAttributes,
    /// Body of a `---- struct table ----` block.
    StructTable,
    /// Body of a `---- struct list ----` block.
    StructList,
    /// Body of a `---- struct cloud ----` block.
    StructCloud,
    /// Body of a `---- struct global ----` block.
    StructGlobal,
    /// Body of a `---- struct serial ----` block.
    StructSerial,
    /// `~~INFO:keyword~~`
    Info,
    /// `{{youtube>id?params|title}}` (vshare plugin).
    Vshare,
    /// `{{fa>name?params}}` (icons plugin).
    Icons,
    /// `{{changes>key=value&...}}`
    Changes,
    /// `~~ORPHANSWANTED:kind!namespace~~`
    OrphansWanted,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Raw (uncompiled) pattern as written in the built-in tables or in a YAML config.
pub struct PatternDefinition {
    /// Literal text to match at the cursor.
    pub literal: Option<String>,
    /// Regex source to match at the cursor (Oniguruma syntax).
    pub regex: Option<String>,
    /// Compile `regex` case-insensitively.
    pub ignore_case: bool,
    /// Only match at the start of a line.
    pub sol: bool,
    /// Regex that must be found in the text left of the cursor on the current line.
    pub behind: Option<String>,
    /// Matching this pattern ends the mode (on the following step).
    pub exit: bool,
    /// Style added to the token produced by this pattern.
    pub style: Option<String>,
    /// Embedded language started when this entry pattern matches.
    pub lang: Option<String>,
    /// Push template activated on top of the entered mode.
    pub push: Option<String>,
}

impl PatternDefinition {
    /// A pattern matching `text` literally.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            literal: Some(text.into()),
            ..Self::default()
        }
    }

    /// A pattern matching the regex `source` anchored at the cursor.
    pub fn regex(source: impl Into<String>) -> Self {
        Self {
            regex: Some(source.into()),
            ..Self::default()
        }
    }

    /// An exit pattern that matches (without consuming) at the start of any line.
    pub fn line_start_exit() -> Self {
        Self {
            sol: true,
            exit: true,
            ..Self::default()
        }
    }

    /// Restrict the pattern to the start of a line.
    pub fn at_line_start(mut self) -> Self {
        self.sol = true;
        self
    }

    /// Require `behind` to be found in the text already consumed on the line.
    pub fn behind(mut self, behind: impl Into<String>) -> Self {
        self.behind = Some(behind.into());
        self
    }

    /// Mark the pattern as an exit pattern.
    pub fn exit(mut self) -> Self {
        self.exit = true;
        self
    }

    /// Compile the regex case-insensitively.
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Style the matched token.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Start an embedded language delegate when this pattern enters its mode.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Activate a push template after entering the mode.
    pub fn push(mut self, template: impl Into<String>) -> Self {
        self.push = Some(template.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
/// Raw (uncompiled) mode as written in the built-in tables or in a YAML config.
pub struct ModeDefinition {
    /// Human-readable mode name (not required to be unique).
    pub name: String,
    /// Registration priority; lower values are tried first.
    #[serde(default)]
    pub priority: i32,
    /// Category of this mode. The base mode has none.
    #[serde(default)]
    pub kind: Option<ModeType>,
    /// Types of modes allowed to nest inside this one. `None` makes the mode a leaf.
    #[serde(default)]
    pub allows: Option<Vec<ModeType>>,
    /// Patterns that enter this mode.
    #[serde(default)]
    pub entries: Vec<PatternDefinition>,
    /// Patterns tried while this mode is active.
    #[serde(default)]
    pub patterns: Vec<PatternDefinition>,
    /// Style applied to every token produced while this mode is on the stack.
    #[serde(default)]
    pub style: Option<String>,
    /// Optional custom step overriding pattern matching.
    #[serde(default)]
    pub step: Option<CustomStep>,
}

impl ModeDefinition {
    /// Start a definition with the given name and priority.
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
            kind: None,
            allows: None,
            entries: Vec::new(),
            patterns: Vec::new(),
            style: None,
            step: None,
        }
    }

    /// Set the type tag.
    pub fn kind(mut self, kind: ModeType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the permitted child types.
    pub fn allows(mut self, types: impl IntoIterator<Item = ModeType>) -> Self {
        self.allows = Some(types.into_iter().collect());
        self
    }

    /// Append an entry pattern.
    pub fn entry(mut self, pattern: PatternDefinition) -> Self {
        self.entries.push(pattern);
        self
    }

    /// Append a continuation/exit pattern.
    pub fn pattern(mut self, pattern: PatternDefinition) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Set the mode style.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Attach a custom step.
    pub fn step(mut self, step: CustomStep) -> Self {
        self.step = Some(step);
        self
    }
}
