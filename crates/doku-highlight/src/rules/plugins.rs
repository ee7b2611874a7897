//! Modes contributed by DokuWiki syntax plugins, each gated by its plugin name.

use crate::mode::{CustomStep, ModeDefinition, ModeType, PatternDefinition, RegistryBuilder};
use crate::rules::base::{INLINE, tag_pair};

use ModeType::{BaseOnly, Container, Disabled, Formatting, Protected, Substitution};

/// Everything an attribute-carrying tag may contain.
const ANY_BLOCK: [ModeType; 6] = [Container, Formatting, BaseOnly, Substitution, Protected, Disabled];

type Group = fn(RegistryBuilder) -> RegistryBuilder;

/// Plugin names and the modes they register, in registration order.
pub const PLUGINS: &[(&str, Group)] = &[
    ("pageredirect", pageredirect),
    ("numberof", numberof),
    ("include", include),
    ("exttab3", exttab3),
    ("bootswrapper", bootswrapper),
    ("blockquote", blockquote),
    ("refnotes", refnotes),
    ("struct", structured_data),
    ("info", info),
    ("fontsize2", fontsize2),
    ("color", color),
    ("randompage2", randompage2),
    ("vshare", vshare),
    ("icons", icons),
    ("imagebox", imagebox),
    ("orphanswanted", orphanswanted),
    ("mathjax", mathjax),
    ("changes", changes),
    ("adhoctags", adhoctags),
    ("comment", comment),
];

const BOOTSWRAPPER_TAGS: &[&str] = &[
    "grid", "panelbody", "column", "hidden", "image", "invisible", "collapse", "jumbotron",
    "carousel", "label", "caption", "lead", "panel", "nav", "list", "wrapper", "pills", "popover",
    "progress", "bar", "row", "show", "slide", "tabs", "text", "thumbnail", "tooltip", "well",
    "callout", "modal", "pane", "pageheader", "accordion", "affix", "alert", "badge", "button",
];

const ADHOC_TAGS: &[&str] = &[
    "article", "header", "footer", "address", "cite", "time", "dfn", "kbd", "samp", "var", "bdi",
    "bdo", "dl", "dd", "summary", "div", "aside", "section", "figure", "figcaption", "q", "abbr",
    "mark", "strong", "small", "em", "h1", "h2", "h3", "h4", "h5", "h6", "dt", "details", "span",
    "pre", "b", "i", "s", "u", "a",
];

const VSHARE_SITES: &[&str] = &[
    "5min", "archiveorg", "bambuser", "bliptv", "break", "clipfish", "dailymotion", "gtrailers",
    "metacafe", "myspacetv", "odysee", "rcmovie", "scivee", "twitchtv", "slideshare", "ustream",
    "veoh", "viddler", "vimeo", "youtube",
];

const ICON_SETS: &[&str] = &[
    "icon", "fa", "ra", "glyphicon", "typcn", "mdi", "fl", "fugue", "oxygen", "breeze",
];

/// Register the modes of every enabled plugin, in [`PLUGINS`] order.
pub fn plugins(builder: RegistryBuilder, enabled: impl Fn(&str) -> bool) -> RegistryBuilder {
    PLUGINS
        .iter()
        .fold(builder, |b, &(name, group)| b.group_if(enabled(name), group))
}

/// Whether `name` is a plugin with highlighting rules.
pub fn is_supported(name: &str) -> bool {
    PLUGINS.iter().any(|&(plugin, _)| plugin == name)
}

fn pageredirect(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("redirect_old", 1)
            .kind(Substitution)
            .entry(PatternDefinition::literal("~~REDIRECT>").style("meta"))
            .step(CustomStep::RedirectOld),
    )
    .mode(
        ModeDefinition::new("redirect_new", 1)
            .kind(Substitution)
            .entry(PatternDefinition::regex("#REDIRECT +").style("meta"))
            .entry(PatternDefinition::regex("#redirect +").style("meta"))
            .step(CustomStep::RedirectNew),
    )
}

fn numberof(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("numberof", 32).kind(Substitution).entry(
            PatternDefinition::regex(r"\{\{NUMBEROF(MEDIAS|PAGES)(>.*?)?\}\}")
                .exit()
                .style("tag"),
        ),
    )
}

fn include(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("include", 50)
            .kind(Substitution)
            .entry(PatternDefinition::regex(r"\{\{(page|section|namespace|tagtopic)>").style("tag"))
            .step(CustomStep::Include),
    )
}

fn exttab3(b: RegistryBuilder) -> RegistryBuilder {
    let cell = |delimiter: &str| PatternDefinition::literal(delimiter).style("def");
    b.mode(
        ModeDefinition::new("exttab3", 59)
            .kind(Container)
            .allows([Container, Formatting, Substitution, Disabled, Protected])
            .entry(PatternDefinition::literal("{|").at_line_start().style("def"))
            .pattern(PatternDefinition::literal("|}").exit().style("def"))
            .pattern(cell("|-"))
            .pattern(cell("|+"))
            .pattern(cell("!!"))
            .pattern(cell("!"))
            .pattern(cell("||"))
            .pattern(cell("|")),
    )
}

/// A tag whose opening `<name` is followed by an attribute list parsed by `template`.
fn attribute_tag(prefix: &str, tag: &str, template: &str) -> ModeDefinition {
    ModeDefinition::new(format!("{prefix}_{tag}"), 195)
        .kind(Formatting)
        .allows(ANY_BLOCK)
        .entry(
            PatternDefinition::regex(format!("<{tag}(?=[ >])"))
                .style("tag")
                .push(template),
        )
        .pattern(PatternDefinition::literal(format!("</{tag}>")).exit().style("tag"))
}

fn bootswrapper(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("bootswrapper_macros", 99)
            .kind(Substitution)
            .entry(PatternDefinition::regex("~~(CLEARFIX|PAGEBREAK)~~").exit())
            .style("meta"),
    )
    .modes(
        BOOTSWRAPPER_TAGS
            .iter()
            .map(|tag| attribute_tag("bootswrapper", tag, "bootswrapper_attr")),
    )
    .template(ModeDefinition::new("bootswrapper_attr", 0).step(CustomStep::Attributes))
}

fn blockquote(b: RegistryBuilder) -> RegistryBuilder {
    let nested = [Container, Substitution, Protected, Disabled, Formatting];
    let block = || {
        ModeDefinition::new("blockquote-block", 123)
            .kind(Container)
            .allows(nested)
            .entry(PatternDefinition::literal("<blockquote>").style("tag"))
            .pattern(PatternDefinition::literal("</blockquote>").exit().style("tag"))
    };

    // Registered twice so a blockquote can open inside another one.
    b.mode(tag_pair("blockquote-cite", 123, "<cite>", "</cite>").allows(nested))
        .mode(block())
        .mode(block())
        .mode(tag_pair("blockquote-inline", 123, "<q>", "</q>"))
}

fn refnotes(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        tag_pair("refnote", 145, "[(", ")]")
            .allows([Formatting, Substitution, Protected, Disabled]),
    )
}

fn structured_data(b: RegistryBuilder) -> RegistryBuilder {
    let block = |kind: &str, priority, step| {
        ModeDefinition::new(format!("struct_{kind}"), priority)
            .kind(Substitution)
            .entry(PatternDefinition::regex(format!("---- *struct *{kind} *----")).style("def"))
            .step(step)
    };

    b.mode(block("cloud", 151, CustomStep::StructCloud))
        .mode(block("table", 155, CustomStep::StructTable))
        .mode(block("list", 155, CustomStep::StructList))
        .mode(block("global", 155, CustomStep::StructGlobal))
        .mode(block("serial", 155, CustomStep::StructSerial))
        .mode(
            ModeDefinition::new("struct_value", 315)
                .kind(Substitution)
                .entry(PatternDefinition::literal("{{$").style("tag"))
                .pattern(PatternDefinition::literal("}}").exit().style("tag")),
        )
}

fn info(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("info", 155)
            .kind(Substitution)
            .entry(PatternDefinition::literal("~~INFO:").style("meta"))
            .step(CustomStep::Info),
    )
}

fn fontsize2(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("fontsize2", 91)
            .kind(Formatting)
            .allows(INLINE)
            .entry(PatternDefinition::regex(r"<fs(\s+[^>]*)?>").style("tag"))
            .pattern(PatternDefinition::literal("</fs>").exit().style("tag")),
    )
}

fn color(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("color", 158)
            .kind(Formatting)
            .allows(INLINE)
            .entry(PatternDefinition::regex(r"<color(\s+[^>]*)?>").style("tag"))
            .pattern(PatternDefinition::literal("</color>").exit().style("tag")),
    )
}

fn randompage2(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(tag_pair(
        "randompage2",
        158,
        "<randompage_link>",
        "</randompage_link>",
    ))
}

fn vshare(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("vshare", 159)
            .kind(Substitution)
            .entry(
                PatternDefinition::regex(format!(r"\{{\{{ ?({})>", VSHARE_SITES.join("|")))
                    .style("tag"),
            )
            .step(CustomStep::Vshare),
    )
}

fn icons(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("icons", 299)
            .kind(Substitution)
            .entry(
                PatternDefinition::regex(format!(r"\{{\{{({})>", ICON_SETS.join("|")))
                    .style("tag"),
            )
            .step(CustomStep::Icons),
    )
}

fn imagebox(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("imagebox", 315)
            .kind(Protected)
            .allows([Formatting, Substitution])
            .entry(PatternDefinition::regex(r"\[\{\{ *"))
            .step(CustomStep::ImageBox),
    )
}

fn orphanswanted(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("orphanswanted", 990)
            .kind(Substitution)
            .entry(PatternDefinition::literal("~~ORPHANSWANTED:").style("meta"))
            .step(CustomStep::OrphansWanted),
    )
}

fn mathjax(b: RegistryBuilder) -> RegistryBuilder {
    let math = |name: &str, tag: &str| {
        ModeDefinition::new(name, 65)
            .kind(Protected)
            .entry(PatternDefinition::literal(format!("<{tag}>")).style("tag").lang("latex"))
            .pattern(PatternDefinition::literal(format!("</{tag}>")).style("tag").exit())
    };
    b.mode(math("mathjax_inline", "math"))
        .mode(math("mathjax_block", "MATH"))
}

fn changes(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("changes", 50)
            .kind(Substitution)
            .entry(PatternDefinition::literal("{{changes>").style("tag"))
            .step(CustomStep::Changes),
    )
}

fn adhoctags(b: RegistryBuilder) -> RegistryBuilder {
    b.modes(
        ADHOC_TAGS
            .iter()
            .chain(&["div", "span"])
            .map(|tag| attribute_tag("adhoctags", tag, "adhoctags_attr")),
    )
    .template(ModeDefinition::new("adhoctags_attr", 0).step(CustomStep::ExtendedAttributes))
}

fn comment(b: RegistryBuilder) -> RegistryBuilder {
    b.mode(
        ModeDefinition::new("plugin_comment", 321)
            .kind(Substitution)
            .entry(PatternDefinition::literal("/*"))
            .pattern(PatternDefinition::literal("*/").exit())
            .style("comment"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(enabled: &[&str]) -> Vec<String> {
        let builder = RegistryBuilder::new().mode(ModeDefinition::new("base", 0));
        let registry = plugins(builder, |name| enabled.contains(&name)).build().unwrap();
        registry.ordered().iter().map(|m| m.name.clone()).collect()
    }

    #[test]
    fn test_groups_are_gated_by_name() {
        assert_eq!(names(&[]), ["base"]);
        assert_eq!(
            names(&["comment", "pageredirect"]),
            ["base", "redirect_old", "redirect_new", "plugin_comment"]
        );
    }

    #[test]
    fn test_nested_tags_are_registered_twice() {
        let names = names(&["adhoctags", "blockquote"]);
        assert_eq!(names.iter().filter(|n| *n == "adhoctags_div").count(), 2);
        assert_eq!(names.iter().filter(|n| *n == "blockquote-block").count(), 2);
    }

    #[test]
    fn test_every_group_compiles() {
        let builder = RegistryBuilder::new().mode(ModeDefinition::new("base", 0));
        let registry = plugins(builder, |_| true).build().unwrap();
        assert_eq!(registry.templates().len(), 2);
        assert!(is_supported("struct"));
        assert!(!is_supported("struct_table"));
    }
}
