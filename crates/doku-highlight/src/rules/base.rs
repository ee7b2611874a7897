//! Modes of the stock DokuWiki syntax.

use crate::config::HighlightConfig;
use crate::mode::{CustomStep, ModeDefinition, ModeType, PatternDefinition, RegistryBuilder};
use crate::rules::words::{email_link_regex, external_link_regex, file_link_regex, words_regex};

use ModeType::{Container, Disabled, Formatting, Protected, Substitution};

/// Types allowed inside inline formatting.
pub(crate) const INLINE: [ModeType; 3] = [Formatting, Substitution, Disabled];

/// Types allowed inside block containers (lists, tables, quotes).
const BLOCK: [ModeType; 4] = [Formatting, Substitution, Disabled, Protected];

/// No word character immediately left of the cursor.
pub(crate) const WORD_START: &str = r"\B$";

/// Register the base mode and every stock DokuWiki construct.
///
/// Word-list modes are only registered when their list is non-empty; CamelCase links only when
/// `config.camelcase` is set.
pub fn dokuwiki(builder: RegistryBuilder, config: &HighlightConfig) -> RegistryBuilder {
    builder
        .mode(ModeDefinition::new("base", 0).allows(ModeType::ALL))
        .modes(blocks())
        .modes(formatting())
        .modes(protected())
        .group_if(!config.smileys.is_empty(), |b| {
            b.mode(word_mode("smiley", 230, &config.smileys))
        })
        .group_if(!config.acronyms.is_empty(), |b| {
            b.mode(word_mode("acronym", 240, &config.sorted_acronyms()))
        })
        .group_if(!config.entities.is_empty(), |b| {
            b.mode(
                ModeDefinition::new("entity", 260)
                    .kind(Substitution)
                    .entry(PatternDefinition::regex(words_regex(&config.entities, "")).exit())
                    .style("keyword"),
            )
        })
        .mode(
            ModeDefinition::new("multiplyentity", 270)
                .kind(Substitution)
                .entry(
                    PatternDefinition::regex(r"(?:[1-9]|\d{2,})(?=[xX]\d+\b)").behind(WORD_START),
                )
                .pattern(PatternDefinition::regex("[xX]").style("keyword"))
                .pattern(PatternDefinition::regex(r"\d+\b").exit()),
        )
        .group_if(config.camelcase, |b| {
            b.mode(
                ModeDefinition::new("camelcaselink", 290)
                    .kind(Substitution)
                    .entry(
                        PatternDefinition::regex(r"[A-Z]+[a-z]+[A-Z][A-Za-z]*\b")
                            .behind(WORD_START)
                            .exit(),
                    )
                    .style("link"),
            )
        })
        .modes(links(&config.schemes))
}

fn word_mode(name: &str, priority: i32, words: &[String]) -> ModeDefinition {
    ModeDefinition::new(name, priority)
        .kind(Substitution)
        .entry(
            PatternDefinition::regex(words_regex(words, r"(?=\W|$)"))
                .behind(WORD_START)
                .exit(),
        )
        .style("keyword")
}

/// A formatting mode delimited by `open` and `close`.
pub(crate) fn tag_pair(name: &str, priority: i32, open: &str, close: &str) -> ModeDefinition {
    ModeDefinition::new(name, priority)
        .kind(Formatting)
        .allows(INLINE)
        .entry(PatternDefinition::literal(open).style("tag"))
        .pattern(PatternDefinition::literal(close).exit().style("tag"))
}

fn blocks() -> Vec<ModeDefinition> {
    vec![
        ModeDefinition::new("listblock", 10)
            .kind(Container)
            .allows(BLOCK)
            .entry(PatternDefinition::regex(r" {2,}[\-\*]").at_line_start().style("def"))
            .entry(PatternDefinition::regex(r"\t+[\-\*]").at_line_start().style("def"))
            .pattern(PatternDefinition::regex(r" {2,}[\-\*]").at_line_start().style("def"))
            .pattern(PatternDefinition::regex(r"\t+[\-\*]").at_line_start().style("def"))
            .pattern(PatternDefinition::line_start_exit()),
        ModeDefinition::new("preformatted", 20)
            .kind(Protected)
            .entry(PatternDefinition::regex(r"  (?![\*\-])").at_line_start())
            .entry(PatternDefinition::regex(r"\t(?![\*\-])").at_line_start())
            .pattern(PatternDefinition::literal("  ").at_line_start())
            .pattern(PatternDefinition::literal("\t").at_line_start())
            .pattern(PatternDefinition::line_start_exit())
            .style("string"),
        ModeDefinition::new("notoc", 30)
            .kind(Substitution)
            .entry(PatternDefinition::literal("~~NOTOC~~").exit())
            .style("meta"),
        ModeDefinition::new("nocache", 40)
            .kind(Substitution)
            .entry(PatternDefinition::literal("~~NOCACHE~~").exit())
            .style("meta"),
        ModeDefinition::new("header", 50)
            .kind(ModeType::BaseOnly)
            .entry(PatternDefinition::regex(r"[ \t]*={2}.+={2,}[ \t]*$").exit())
            .style("header"),
        ModeDefinition::new("table", 60)
            .kind(Container)
            .allows(BLOCK)
            .entry(PatternDefinition::literal("^").at_line_start().style("def"))
            .entry(PatternDefinition::literal("|").at_line_start().style("def"))
            .pattern(PatternDefinition::literal("^").style("def"))
            .pattern(PatternDefinition::literal("|").style("def"))
            .pattern(PatternDefinition::regex(r"[\t ]*:::[\t ]*(?=[\|\^])").style("def"))
            .pattern(PatternDefinition::regex(r"[\t ]+"))
            .pattern(PatternDefinition::line_start_exit()),
    ]
}

fn formatting() -> Vec<ModeDefinition> {
    let delimited = |name: &str, priority, delimiter: &str, style: &str| {
        ModeDefinition::new(name, priority)
            .kind(Formatting)
            .allows(INLINE)
            .entry(PatternDefinition::literal(delimiter))
            .pattern(PatternDefinition::literal(delimiter).exit())
            .style(style)
    };

    vec![
        delimited("strong", 70, "**", "strong"),
        ModeDefinition::new("emphasis", 80)
            .kind(Formatting)
            .allows(INLINE)
            .entry(PatternDefinition::regex(r"//(?=.*[^:])"))
            .pattern(PatternDefinition::literal("//").exit())
            .style("em"),
        delimited("underline", 90, "__", "underline"),
        delimited("monospace", 100, "''", "quote"),
        tag_pair("subscript", 110, "<sub>", "</sub>"),
        tag_pair("superscript", 120, "<sup>", "</sup>"),
        tag_pair("deleted", 130, "<del>", "</del>"),
        ModeDefinition::new("linebreak", 140)
            .kind(Substitution)
            .entry(PatternDefinition::regex(r"\\\\(?:[ \t]|$)").exit())
            .style("tag"),
        tag_pair("footnote", 150, "((", "))")
            .allows([Container, Formatting, Substitution, Protected, Disabled]),
        ModeDefinition::new("hr", 160)
            .kind(Container)
            .entry(PatternDefinition::regex(r"[ \t]*-{4,}[ \t]*$").at_line_start().exit())
            .style("hr"),
    ]
}

fn protected() -> Vec<ModeDefinition> {
    let delegated = |name: &str, priority, tag: &str, lang: &str| {
        ModeDefinition::new(name, priority)
            .kind(Protected)
            .entry(PatternDefinition::literal(format!("<{tag}>")).style("tag").lang(lang))
            .pattern(PatternDefinition::literal(format!("</{tag}>")).exit().style("tag"))
    };
    let code = |name: &str, priority| {
        ModeDefinition::new(name, priority)
            .kind(Protected)
            .entry(PatternDefinition::regex(format!(r"<{name}(?=\s|>|$)")).style("tag"))
            .pattern(PatternDefinition::literal(format!("</{name}>")).exit().style("tag"))
            .step(CustomStep::CodeBlock)
    };

    vec![
        ModeDefinition::new("unformatted", 170)
            .kind(Disabled)
            .entry(PatternDefinition::literal("<nowiki>").style("tag"))
            .pattern(PatternDefinition::literal("</nowiki>").exit().style("tag")),
        ModeDefinition::new("unformattedalt", 170)
            .kind(Disabled)
            .entry(PatternDefinition::literal("%%"))
            .pattern(PatternDefinition::literal("%%").exit())
            .style("string"),
        delegated("php", 180, "php", "php"),
        delegated("phpblock", 180, "PHP", "php"),
        delegated("html", 190, "html", "html"),
        delegated("htmlblock", 190, "HTML", "html"),
        code("code", 200),
        code("file", 210),
        ModeDefinition::new("quote", 220)
            .kind(Container)
            .allows(BLOCK)
            .entry(PatternDefinition::regex(">+").at_line_start().style("def"))
            .pattern(PatternDefinition::regex(">+").at_line_start().style("def"))
            .pattern(PatternDefinition::line_start_exit()),
    ]
}

fn links(schemes: &[String]) -> Vec<ModeDefinition> {
    vec![
        ModeDefinition::new("internallink", 300)
            .kind(Substitution)
            .entry(PatternDefinition::literal("[["))
            .step(CustomStep::InternalLink),
        ModeDefinition::new("rss", 310)
            .kind(Substitution)
            .entry(PatternDefinition::literal("{{rss>").style("tag"))
            .pattern(PatternDefinition::literal("}}").exit().style("tag")),
        ModeDefinition::new("media", 320)
            .kind(Substitution)
            .entry(PatternDefinition::regex(r"\{\{ *"))
            .step(CustomStep::Media),
        ModeDefinition::new("externallink", 330)
            .kind(Substitution)
            .entry(
                PatternDefinition::regex(external_link_regex(schemes))
                    .ignore_case()
                    .behind(WORD_START)
                    .exit(),
            )
            .style("link"),
        ModeDefinition::new("emaillink", 340)
            .kind(Substitution)
            .entry(PatternDefinition::regex(email_link_regex()).ignore_case().exit())
            .style("link"),
        ModeDefinition::new("windowssharelink", 350)
            .kind(Substitution)
            .entry(PatternDefinition::regex(r"\\\\\w+?(?:\\[\w$-]+)+").exit())
            .style("link"),
        ModeDefinition::new("filelink", 360)
            .kind(Substitution)
            .entry(
                PatternDefinition::regex(file_link_regex())
                    .ignore_case()
                    .behind(WORD_START)
                    .exit(),
            )
            .style("link"),
    ]
}
