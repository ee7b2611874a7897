//! Regex builders for word lists and link syntaxes.

const PUNCTUATION: &str = r".:?\-;,";
const HOST: &str = r"\w.:?\-;,";
const URL_CHARS: &str = r"\w/\#~:.?+=&%@!\-\[\].:?\-;,";

/// Alternation of `words` (regex-escaped) followed by `end`.
///
/// ```
/// use doku_highlight::rules::words_regex;
///
/// assert_eq!(words_regex(&[":)", ";)"], ""), r"(?::\)|;\))");
/// ```
pub fn words_regex<S: AsRef<str>>(words: &[S], end: &str) -> String {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    format!("(?:{alternation}){end}")
}

/// External links for the given URL schemes, plus bare `www.` and `ftp.` hosts.
///
/// Compile case-insensitively.
pub fn external_link_regex<S: AsRef<str>>(schemes: &[S]) -> String {
    let tail = format!("[{URL_CHARS}]+?(?=[{PUNCTUATION}]*[^{URL_CHARS}]|$)");
    let mut alternatives: Vec<String> = schemes
        .iter()
        .map(|scheme| format!("{}://{tail}", regex::escape(scheme.as_ref())))
        .collect();
    for host in ["www?", "ftp?"] {
        alternatives.push(format!(r"{host}\.[{HOST}]+?\.[{HOST}]+?{tail}"));
    }
    format!("(?:{})", alternatives.join("|"))
}

/// `<user@example.com>`. Compile case-insensitively.
pub fn email_link_regex() -> String {
    let text = r"[0-9a-zA-Z!#$%&'*+/=?^_`{|}~-]+";
    format!(r"<{text}(?:\.{text})*@(?:[0-9a-z][0-9a-z-]*\.)+(?:[a-z]{{2,4}}|museum|travel)>")
}

/// `file://` links. Compile case-insensitively.
pub fn file_link_regex() -> String {
    format!("file://[{URL_CHARS}]+?(?=[{PUNCTUATION}]*[^{URL_CHARS}]|$)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::compile_regex;
    use onig::SearchOptions;

    fn match_len(source: &str, text: &str) -> Option<usize> {
        let regex = compile_regex(source, true).unwrap();
        regex.match_with_options(text, 0, SearchOptions::SEARCH_OPTION_NONE, None)
    }

    #[test]
    fn test_words_are_escaped() {
        let source = words_regex(&["C++", "a.b"], r"(?=\W|$)");
        assert_eq!(match_len(&source, "C++ rocks"), Some(3));
        assert_eq!(match_len(&source, "axb"), None);
    }

    #[test]
    fn test_external_link_stops_before_trailing_punctuation() {
        let source = external_link_regex(&["http", "https"]);
        assert_eq!(match_len(&source, "https://example.com/x. Next"), Some(21));
        assert_eq!(match_len(&source, "www.example.com"), Some(15));
        assert_eq!(match_len(&source, "gopher://x"), None);
    }

    #[test]
    fn test_email_and_file_links() {
        assert_eq!(match_len(&email_link_regex(), "<a.b@example.org> x"), Some(17));
        assert_eq!(match_len(&email_link_regex(), "<nobody>"), None);
        assert_eq!(match_len(&file_link_regex(), "file://srv/share"), Some(16));
    }
}
