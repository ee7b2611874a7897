use doku_highlight::{HighlightConfig, LineCursor, NoLanguages, State, Tokenizer, highlight_text};
use std::sync::Arc;

const EXTENSIONS: &str = include_str!("fixtures/extensions.yaml");

fn tokenizer() -> Tokenizer {
    HighlightConfig::from_yaml_str(EXTENSIONS)
        .expect("parse extensions")
        .tokenizer(Arc::new(NoLanguages))
        .expect("build tokenizer")
}

fn tokens(tokenizer: &Tokenizer, state: &mut State, line: &str) -> Vec<(String, Option<String>)> {
    let mut cursor = LineCursor::new(line);
    let mut out = Vec::new();
    while !cursor.is_at_end_of_line() {
        let token = tokenizer.token(state, &mut cursor);
        out.push((cursor.current().to_string(), token.style));
    }
    out
}

/// `(text, style)` of every styled span, line by line.
fn styled(tokenizer: &Tokenizer, text: &str) -> Vec<(usize, String, String)> {
    let lines: Vec<&str> = text.lines().collect();
    highlight_text(tokenizer, text)
        .into_iter()
        .map(|s| (s.line, lines[s.line][s.start..s.end].to_string(), s.style))
        .collect()
}

fn entry(line: usize, text: &str, style: &str) -> (usize, String, String) {
    (line, text.to_string(), style.to_string())
}

#[test]
fn test_internal_link_with_title() {
    let t = tokenizer();
    assert_eq!(
        styled(&t, "go [[ns:page|Some Title]] now"),
        [entry(0, "ns:page", "link"), entry(0, "Some Title", "string")]
    );
}

#[test]
fn test_media_parameters_and_title() {
    let t = tokenizer();
    assert_eq!(
        styled(&t, "{{ns:img.png?50 nolink|Cap}}"),
        [
            entry(0, "ns:img.png", "link"),
            entry(0, "50", "number"),
            entry(0, "nolink", "keyword"),
            entry(0, "Cap", "string"),
        ]
    );
}

#[test]
fn test_struct_table_block() {
    let t = tokenizer();
    let page = "---- struct table ----\nschema: products\ncols: %pageid%, $STRUCT.products.name$\nbogus: 1\n----\n**after**";
    assert_eq!(
        styled(&t, page),
        [
            entry(0, "---- struct table ----", "def"),
            entry(1, "schema", "def"),
            entry(2, "cols", "def"),
            entry(2, "%pageid%", "keyword"),
            entry(2, "$STRUCT.products.name$", "keyword"),
            entry(3, "bogus", "error"),
            entry(4, "----", "def"),
            entry(5, "**after**", "strong"),
        ]
    );
}

#[test]
fn test_adhoc_tag_attributes_use_push_template() {
    let t = tokenizer();
    let mut state = t.start_state();
    let out = tokens(&t, &mut state, "<div [class=big]>hi</div>");

    let pairs: Vec<(&str, Option<&str>)> = out
        .iter()
        .map(|(text, style)| (text.as_str(), style.as_deref()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("<div", Some("tag")),
            (" ", Some("attribute")),
            ("[", Some("bracket")),
            ("class", Some("attribute")),
            ("=", Some("operator")),
            ("b", Some("string")),
            ("i", Some("string")),
            ("g", Some("string")),
            ("]", Some("bracket")),
            (">", Some("tag")),
            ("h", None),
            ("i", None),
            ("</div>", Some("tag")),
        ]
    );
}

#[test]
fn test_nested_adhoc_tags() {
    let t = tokenizer();
    let mut state = t.start_state();
    tokens(&t, &mut state, "<div><div>");
    assert_eq!(state.depth(), 3);
    assert!(state.scratch().code_lang().is_none());

    tokens(&t, &mut state, "</div></div>");
    tokens(&t, &mut state, "x");
    assert_eq!(state.depth(), 1);
}

#[test]
fn test_bootswrapper_attributes() {
    let t = tokenizer();
    assert_eq!(
        styled(&t, r#"<panel type="info">"#),
        [
            entry(0, "<panel", "tag"),
            entry(0, " type", "attribute"),
            entry(0, "=", "operator"),
            entry(0, r#""info""#, "string"),
            entry(0, ">", "tag"),
        ]
    );
}

#[test]
fn test_redirect_new_ends_at_line_end() {
    let t = tokenizer();
    let mut state = t.start_state();
    let out = tokens(&t, &mut state, "#REDIRECT other:page");
    assert_eq!(out[0], ("#REDIRECT ".to_string(), Some("meta".to_string())));
    assert!(out[1..].iter().all(|(_, s)| s.as_deref() == Some("link")));

    assert_eq!(tokens(&t, &mut state, "text"), [
        ("t".to_string(), None),
        ("e".to_string(), None),
        ("x".to_string(), None),
        ("t".to_string(), None),
    ]);
    assert_eq!(state.depth(), 1);
}

#[test]
fn test_macros() {
    let t = tokenizer();
    assert_eq!(
        styled(&t, "~~REDIRECT>target~~\n~~INFO:syntaxplugins~~\n~~ORPHANSWANTED:orphans!start~~"),
        [
            entry(0, "~~REDIRECT>", "meta"),
            entry(0, "target", "link"),
            entry(0, "~~", "meta"),
            entry(1, "~~INFO:", "meta"),
            entry(1, "syntaxplugins", "keyword"),
            entry(1, "~~", "meta"),
            entry(2, "~~ORPHANSWANTED:", "meta"),
            entry(2, "orphans", "keyword"),
            entry(2, "start", "string"),
            entry(2, "~~", "meta"),
        ]
    );
}

#[test]
fn test_word_lists_and_camelcase() {
    let t = tokenizer();
    assert_eq!(
        styled(&t, "HTML5 FAQ :-) WikiWord a -> b"),
        [
            entry(0, "HTML5", "keyword"),
            entry(0, "FAQ", "keyword"),
            entry(0, ":-)", "keyword"),
            entry(0, "WikiWord", "link"),
            entry(0, "->", "keyword"),
        ]
    );
}

#[test]
fn test_comment_and_math() {
    let t = tokenizer();
    assert_eq!(
        styled(&t, "/* note */ <math>x^2</math>"),
        [
            entry(0, "/* note */", "comment"),
            entry(0, "<math>", "tag"),
            entry(0, "</math>", "tag"),
        ]
    );
}

#[test]
fn test_disabled_plugins_are_plain_text() {
    let t = HighlightConfig::default()
        .tokenizer(Arc::new(NoLanguages))
        .unwrap();
    assert!(styled(&t, "/* note */ ~~INFO:syntaxplugins~~ <div>").is_empty());
}

#[test]
fn test_host_mode_cannot_replace_base() {
    let yaml = r#"
modes:
  - name: early
    priority: -1
    kind: substitution
    entries:
      - literal: '@@'
        exit: true
    style: keyword
"#;
    let t = HighlightConfig::from_yaml_str(yaml)
        .unwrap()
        .tokenizer(Arc::new(NoLanguages))
        .unwrap();
    let graph = t.graph();
    assert_eq!(graph.mode(graph.base()).name, "base");
    assert_eq!(graph.ordered()[1].name, "early");
    assert_eq!(
        styled(&t, "**bold** @@"),
        [entry(0, "**bold**", "strong"), entry(0, "@@", "keyword")]
    );
}

#[test]
fn test_imagebox_title_allows_formatting_and_links() {
    let t = HighlightConfig::from_yaml_str("extensions: [imagebox]")
        .unwrap()
        .tokenizer(Arc::new(NoLanguages))
        .unwrap();
    let mut state = t.start_state();
    let out = tokens(&t, &mut state, "[{{a.png|**b** [[p]]}}]");
    let pairs: Vec<(&str, Option<&str>)> = out
        .iter()
        .map(|(text, style)| (text.as_str(), style.as_deref()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("[{{", None),
            ("a", Some("link")),
            (".", Some("link")),
            ("p", Some("link")),
            ("n", Some("link")),
            ("g", Some("link")),
            ("|", None),
            ("**", Some("strong")),
            ("b", Some("strong")),
            ("**", Some("strong")),
            (" ", Some("string")),
            ("[[", None),
            ("p", Some("string")),
            ("]]", None),
            ("}}]", None),
        ]
    );
    assert_eq!(state.depth(), 1);
}
