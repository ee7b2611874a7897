//! Custom step capabilities.
//!
//! A mode carrying a [`CustomStep`] runs it before its own continuation patterns. Steps get
//! their inputs explicitly (cursor, scratch, language validator) and report what the engine
//! should do next through a [`StepOutcome`]; they never touch the mode stack themselves.

use crate::mode::cursor::LineCursor;
use crate::mode::definition::CustomStep;
use crate::mode::delegate::LanguageProvider;
use crate::mode::error::ModeError;
use crate::mode::pattern::compile_regex;
use crate::mode::state::{Scratch, ScratchFlag};
use crate::rules::words::words_regex;
use onig::Regex;

const STRUCT_MACROS: &[&str] = &[
    "%pageid%",
    "%title%",
    "%rowid%",
    "%lastupdate%",
    "%lasteditor%",
    "%lastsummary%",
    "$USER$",
    "$USER.name$",
    "$USER.email$",
    "$USER.grps$",
    "$TODAY$",
    "$ID$",
    "$PAGE$",
    "$NS$",
];

const STRUCT_TABLE_OPTIONS: &[&str] = &[
    "schema", "from", "cols", "field", "select", "head", "header", "headers", "max", "limit",
    "sort", "order", "filter", "where", "filterand", "and", "filteror", "or", "dynfilters",
    "summarize", "align", "rownumbers", "width", "widths", "csv",
];

const STRUCT_LIST_OPTIONS: &[&str] = &[
    "schema", "from", "cols", "select", "head", "header", "headers", "max", "limit", "sort",
    "order", "filter", "where", "filterand", "and", "filteror", "or",
];

const STRUCT_CLOUD_OPTIONS: &[&str] = &[
    "schema", "from", "tables", "field", "select", "cols", "col", "limit", "max", "min", "page",
    "target", "summarize",
];

const STRUCT_GLOBAL_OPTIONS: &[&str] = &[
    "schema", "from", "head", "header", "headers", "max", "limit", "sort", "order", "filter",
    "where", "filterand", "and", "filteror", "or", "dynfilters", "summarize", "align", "width",
    "widths", "csv",
];

const INFO_KEYWORDS: &[&str] = &[
    "syntaxmodes",
    "syntaxtypes",
    "syntaxplugins",
    "adminplugins",
    "actionplugins",
    "rendererplugins",
    "helperplugins",
    "helpermethods",
    "datetime",
];

const ORPHANSWANTED_KEYWORDS: &[&str] = &["orphans", "wanted", "valid", "all"];

/// Regexes used by the custom steps, compiled once per graph.
#[derive(Debug)]
pub(crate) struct StepMatchers {
    whitespace: Regex,
    code_param: Regex,
    media_close: Regex,
    imagebox_close: Regex,
    media_title: Regex,
    media_flag: Regex,
    media_cache: Regex,
    media_size: Regex,
    media_params: Regex,
    struct_key: Regex,
    struct_macro: Regex,
    struct_column: Regex,
    info_keyword: Regex,
    orphans_keyword: Regex,
    changes_separator: Regex,
    changes_attribute: Regex,
    icon_separator: Regex,
    vshare_separator: Regex,
    ext_attribute: Regex,
    quoted: Regex,
}

impl StepMatchers {
    pub(crate) fn compile() -> Result<Self, ModeError> {
        let re = |source: &str| compile_regex(source, false);
        Ok(Self {
            whitespace: re(r"\s+")?,
            code_param: re(r"[^\s>]+")?,
            media_close: re(r" *\}\}")?,
            imagebox_close: re(r" *\}\}\]")?,
            media_title: re(r"\s*\|")?,
            media_flag: re(r"(?:nolink|direct|linkonly)")?,
            media_cache: re(r"(?:nocache|recache)")?,
            media_size: re(r"\d+(?:[xX]\d+)?")?,
            media_params: re(r"\?(?=[^?]*$)")?,
            struct_key: re(r".+?(?=:)")?,
            struct_macro: re(&words_regex(STRUCT_MACROS, ""))?,
            struct_column: re(r"\$STRUCT\.[^.\s]+\.[^\s$]+\$?")?,
            info_keyword: re(&words_regex(INFO_KEYWORDS, ""))?,
            orphans_keyword: re(&words_regex(ORPHANSWANTED_KEYWORDS, ""))?,
            changes_separator: re(r"[&=]")?,
            changes_attribute: re(r"[^&=]+?(?==)")?,
            icon_separator: re(r"[&?]")?,
            vshare_separator: re(r"[&?]")?,
            ext_attribute: re(r"[^\]]+(?==)")?,
            quoted: re(r#"".+?""#)?,
        })
    }
}

/// Inputs a custom step may read or update.
pub(crate) struct StepContext<'s> {
    pub scratch: &'s mut Scratch,
    pub languages: &'s dyn LanguageProvider,
    pub matchers: &'s StepMatchers,
    pub delegate_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What the engine should do after a custom step.
pub(crate) enum StepAction {
    Stay,
    /// Pop the mode now, so the token is styled by the parent.
    Pop,
    /// Start the embedded language delegate (`None` for no language).
    EnterDelegate(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StepOutcome {
    pub style: Option<&'static str>,
    pub action: StepAction,
}

impl StepOutcome {
    fn stay(style: Option<&'static str>) -> Self {
        Self {
            style,
            action: StepAction::Stay,
        }
    }

    fn styled(style: &'static str) -> Self {
        Self::stay(Some(style))
    }

    fn pop(style: Option<&'static str>) -> Self {
        Self {
            style,
            action: StepAction::Pop,
        }
    }
}

impl CustomStep {
    /// Run the step. The engine checks whether the cursor moved.
    pub(crate) fn run(self, cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
        match self {
            CustomStep::CodeBlock => code_block(cursor, cx),
            CustomStep::InternalLink => internal_link(cursor, cx),
            CustomStep::Media => media(cursor, cx, false),
            CustomStep::ImageBox => media(cursor, cx, true),
            CustomStep::RedirectOld => {
                if cursor.match_literal("~~") {
                    StepOutcome::pop(Some("meta"))
                } else {
                    cursor.next_char();
                    StepOutcome::styled("link")
                }
            }
            CustomStep::RedirectNew => {
                if cursor.is_at_start_of_line() {
                    StepOutcome::pop(None)
                } else {
                    cursor.next_char();
                    StepOutcome::styled("link")
                }
            }
            CustomStep::Include => include(cursor, cx),
            CustomStep::Attributes => attributes(cursor, cx),
            CustomStep::ExtendedAttributes => extended_attributes(cursor, cx),
            CustomStep::StructTable => struct_block(cursor, cx, STRUCT_TABLE_OPTIONS),
            CustomStep::StructList => struct_block(cursor, cx, STRUCT_LIST_OPTIONS),
            CustomStep::StructCloud => struct_block(cursor, cx, STRUCT_CLOUD_OPTIONS),
            CustomStep::StructGlobal | CustomStep::StructSerial => {
                struct_block(cursor, cx, STRUCT_GLOBAL_OPTIONS)
            }
            CustomStep::Info => {
                if cursor.match_literal("~~") {
                    StepOutcome::pop(Some("meta"))
                } else if cursor.match_regex(&cx.matchers.info_keyword) {
                    StepOutcome::styled("keyword")
                } else {
                    cursor.next_char();
                    StepOutcome::styled("error")
                }
            }
            CustomStep::Vshare => vshare(cursor, cx),
            CustomStep::Icons => icons(cursor, cx),
            CustomStep::Changes => changes(cursor, cx),
            CustomStep::OrphansWanted => orphans_wanted(cursor, cx),
        }
    }
}

fn code_block(cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
    if cx.delegate_active {
        return StepOutcome::stay(None);
    }

    if cursor.match_literal(">") {
        let lang = cx.scratch.take_code_lang();
        cx.scratch.set(ScratchFlag::CodeFilename, false);
        return StepOutcome {
            style: Some("tag"),
            action: StepAction::EnterDelegate(lang),
        };
    }

    if cursor.match_regex(&cx.matchers.whitespace) {
        return StepOutcome::stay(None);
    }

    let from = cursor.pos();
    if cursor.match_regex(&cx.matchers.code_param) {
        let word = &cursor.line()[from..cursor.pos()];
        let style = if cx.scratch.code_lang().is_none() {
            cx.scratch.set_code_lang(Some(word.to_string()));
            if cx.languages.is_known(word) {
                "keyword"
            } else {
                "error"
            }
        } else if !cx.scratch.is_set(ScratchFlag::CodeFilename) {
            cx.scratch.set(ScratchFlag::CodeFilename, true);
            "string"
        } else {
            "error"
        };
        return StepOutcome::styled(style);
    }

    StepOutcome::stay(None)
}

fn internal_link(cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
    if cursor.match_literal("]]") {
        return StepOutcome::pop(None);
    }
    let in_title = cx.scratch.is_set(ScratchFlag::LinkTitle);
    if !in_title && cursor.match_literal("|") {
        cx.scratch.set(ScratchFlag::LinkTitle, true);
        return StepOutcome::stay(None);
    }
    cursor.next_char();
    StepOutcome::styled(if in_title { "string" } else { "link" })
}

/// `{{...}}` media, or `[{{...}}]` for the imagebox plugin.
fn media(cursor: &mut LineCursor<'_>, cx: StepContext<'_>, boxed: bool) -> StepOutcome {
    let m = cx.matchers;
    let close = if boxed { &m.imagebox_close } else { &m.media_close };
    if cursor.match_regex(close) {
        return StepOutcome::pop(None);
    }
    if cx.scratch.is_set(ScratchFlag::LinkTitle) {
        cursor.next_char();
        return StepOutcome::styled("string");
    }
    if cursor.match_regex(&m.media_title) {
        cx.scratch.set(ScratchFlag::LinkTitle, true);
        return StepOutcome::stay(None);
    }
    if cx.scratch.is_set(ScratchFlag::LinkParam) {
        if cursor.match_regex(&m.media_flag) {
            return StepOutcome::styled("keyword");
        }
        if cursor.match_regex(&m.media_cache) {
            return StepOutcome::styled("meta");
        }
        if cursor.match_regex(&m.media_size) {
            return StepOutcome::styled("number");
        }
        if cursor.match_regex(&m.whitespace) {
            return StepOutcome::stay(None);
        }
        cursor.next_char();
        return StepOutcome::styled("error");
    }
    if cursor.match_regex(&m.media_params) {
        cx.scratch.set(ScratchFlag::LinkParam, true);
        return StepOutcome::stay(None);
    }
    cursor.next_char();
    StepOutcome::styled("link")
}

fn include(cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
    if cursor.match_literal("}}") {
        return StepOutcome::pop(Some("tag"));
    }
    if cursor.match_literal("&") {
        cx.scratch.set(ScratchFlag::IsLink, true);
        return StepOutcome::stay(None);
    }
    cursor.next_char();
    if cx.scratch.is_set(ScratchFlag::IsLink) {
        StepOutcome::styled("keyword")
    } else {
        StepOutcome::styled("link")
    }
}

fn attributes(cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
    if cursor.match_literal(">") {
        return StepOutcome::pop(Some("tag"));
    }
    if cursor.match_regex(&cx.matchers.quoted) {
        return StepOutcome::styled("string");
    }
    if cursor.match_literal("=") {
        return StepOutcome::styled("operator");
    }
    cursor.next_char();
    StepOutcome::styled("attribute")
}

fn extended_attributes(cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
    if cursor.match_literal(">") {
        return StepOutcome::pop(Some("tag"));
    }
    if cursor.match_literal("]") {
        cx.scratch.set(ScratchFlag::IsExtAttr, false);
        return StepOutcome::styled("bracket");
    }
    if cursor.match_literal("[") {
        cx.scratch.set(ScratchFlag::IsExtAttr, true);
        return StepOutcome::styled("bracket");
    }
    if cx.scratch.is_set(ScratchFlag::IsExtAttr) {
        if cursor.match_regex(&cx.matchers.ext_attribute) {
            return StepOutcome::styled("attribute");
        }
        if cursor.match_literal("=") {
            return StepOutcome::styled("operator");
        }
        cursor.next_char();
        return StepOutcome::styled("string");
    }
    cursor.next_char();
    StepOutcome::styled("attribute")
}

fn struct_block(
    cursor: &mut LineCursor<'_>,
    cx: StepContext<'_>,
    options: &[&str],
) -> StepOutcome {
    let m = cx.matchers;
    if cursor.match_literal("----") {
        return StepOutcome::pop(Some("def"));
    }
    if cursor.is_at_start_of_line() && cursor.match_regex(&m.struct_key) {
        let key = cursor.text_before_cursor();
        return StepOutcome::styled(if options.contains(&key) { "def" } else { "error" });
    }
    if cursor.match_regex(&m.struct_macro) || cursor.match_regex(&m.struct_column) {
        return StepOutcome::styled("keyword");
    }
    cursor.next_char();
    StepOutcome::stay(None)
}

fn vshare(cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
    if cursor.match_literal("}}") {
        return StepOutcome::pop(Some("tag"));
    }
    if cursor.match_literal("|") {
        cx.scratch.set(ScratchFlag::IsLink, false);
        cx.scratch.set(ScratchFlag::IsString, true);
        return StepOutcome::stay(None);
    }
    let in_title = cx.scratch.is_set(ScratchFlag::IsString);
    if !in_title && cursor.match_regex(&cx.matchers.vshare_separator) {
        cx.scratch.set(ScratchFlag::IsLink, true);
        return StepOutcome::stay(None);
    }
    cursor.next_char();
    if cx.scratch.is_set(ScratchFlag::IsLink) {
        StepOutcome::styled("keyword")
    } else if in_title {
        StepOutcome::styled("string")
    } else {
        StepOutcome::styled("link")
    }
}

fn icons(cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
    if cursor.match_literal("}}") {
        return StepOutcome::pop(Some("tag"));
    }
    if cursor.match_regex(&cx.matchers.icon_separator) {
        cx.scratch.set(ScratchFlag::IsAttr, true);
        return StepOutcome::styled("operator");
    }
    cursor.next_char();
    if cx.scratch.is_set(ScratchFlag::IsAttr) {
        StepOutcome::styled("keyword")
    } else {
        StepOutcome::styled("link")
    }
}

fn changes(cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
    if cursor.match_literal("}}") {
        return StepOutcome::pop(Some("tag"));
    }
    if cursor.match_regex(&cx.matchers.changes_separator) {
        return StepOutcome::styled("operator");
    }
    if cursor.match_regex(&cx.matchers.changes_attribute) {
        return StepOutcome::styled("attribute");
    }
    cursor.next_char();
    StepOutcome::styled("string")
}

fn orphans_wanted(cursor: &mut LineCursor<'_>, cx: StepContext<'_>) -> StepOutcome {
    if cursor.match_literal("~~") {
        return StepOutcome::pop(Some("meta"));
    }
    if cursor.match_literal("!") {
        cx.scratch.set(ScratchFlag::IsLink, true);
        return StepOutcome::stay(None);
    }
    if cx.scratch.is_set(ScratchFlag::IsLink) {
        cursor.next_char();
        return StepOutcome::styled("string");
    }
    if cursor.match_regex(&cx.matchers.orphans_keyword) {
        return StepOutcome::styled("keyword");
    }
    cursor.next_char();
    StepOutcome::styled("error")
}
