use doku_highlight::{HighlightConfig, LineCursor, Tokenizer};
use doku_highlight_simple::SimpleLanguages;
use std::sync::Arc;

fn tokenizer() -> Tokenizer {
    let languages = SimpleLanguages::with_defaults().expect("default languages");
    HighlightConfig::default()
        .tokenizer(Arc::new(languages))
        .expect("build tokenizer")
}

fn tokenize(text: &str) -> Vec<Vec<(String, Option<String>)>> {
    let tokenizer = tokenizer();
    let mut state = tokenizer.start_state();
    text.lines()
        .map(|line| {
            if line.is_empty() {
                tokenizer.blank_line(&mut state);
                return Vec::new();
            }
            let mut cursor = LineCursor::new(line);
            let mut tokens = Vec::new();
            while !cursor.is_at_end_of_line() {
                let token = tokenizer.token(&mut state, &mut cursor);
                tokens.push((cursor.current().to_string(), token.style));
            }
            tokens
        })
        .collect()
}

fn pair(text: &str, style: Option<&str>) -> (String, Option<String>) {
    (text.to_string(), style.map(str::to_string))
}

#[test]
fn test_code_block_with_known_language() {
    let lines = tokenize("<code java>\nint x;\n</code>\nafter");

    assert_eq!(
        lines[0],
        [
            pair("<code", Some("tag")),
            pair(" ", None),
            pair("java", Some("keyword")),
            pair(">", Some("tag")),
        ]
    );
    assert_eq!(
        lines[1],
        [
            pair("int", Some("keyword")),
            pair(" ", None),
            pair("x", None),
            pair(";", None),
        ]
    );
    assert_eq!(lines[2], [pair("</code>", Some("tag"))]);
    assert_eq!(lines[3].iter().filter(|(_, s)| s.is_some()).count(), 0);
}

#[test]
fn test_code_block_with_unknown_language() {
    let lines = tokenize("<code frobnicate>\nint x;\n</code>");

    assert_eq!(lines[0][2], pair("frobnicate", Some("error")));
    assert_eq!(lines[1], [pair("int x;", None)]);
    assert_eq!(lines[2], [pair("</code>", Some("tag"))]);
}

#[test]
fn test_delegate_stops_before_exit_on_the_same_line() {
    let lines = tokenize("<php>echo \"</php\";</php> **b**");

    let tokens = &lines[0];
    assert_eq!(tokens[0], pair("<php>", Some("tag")));
    assert_eq!(tokens[1], pair("echo", Some("keyword")));
    assert!(tokens.contains(&pair("</php>", Some("tag"))));
    assert!(tokens.contains(&pair("**", Some("strong"))));
}

#[test]
fn test_block_comment_inside_html() {
    let lines = tokenize("<html>\n<!-- a\nb --><b>\n</html>");

    assert_eq!(lines[1], [pair("<!-- a", Some("comment"))]);
    assert_eq!(lines[2][0], pair("b -->", Some("comment")));
    assert_eq!(lines[2][1], pair("<b", Some("tag")));
    assert_eq!(lines[3], [pair("</html>", Some("tag"))]);
}

#[test]
fn test_inner_language_and_indent() {
    let tokenizer = tokenizer();
    let mut state = tokenizer.start_state();
    for line in ["<file java Main.java>", "class Main {"] {
        let mut cursor = LineCursor::new(line);
        while !cursor.is_at_end_of_line() {
            tokenizer.token(&mut state, &mut cursor);
        }
    }

    assert_eq!(tokenizer.inner_language(&state), Some("java"));
    assert_eq!(tokenizer.indent(&state, "int x;"), Some(4));
    assert_eq!(tokenizer.indent(&state, "}"), Some(0));
}
