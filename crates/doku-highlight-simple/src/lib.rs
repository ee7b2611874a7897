//! `doku-highlight-simple` - Simple (regex-based) embedded language tokenizers for
//! `doku-highlight`.
//!
//! These are intended for the content of `<code>`, `<php>`, `<html>` and `<math>` blocks, where a
//! handful of rules (comments, strings, keywords, numbers) is enough. They are *not* parsers.

use doku_highlight::{DelegateState, LanguageProvider, LineCursor};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// A single regex tokenizing rule.
///
/// The rule applies only when its match starts exactly at the cursor.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
    style: Option<String>,
}

impl RegexRule {
    pub fn new(pattern: &str, style: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            style: Some(style.to_string()),
        })
    }

    /// A rule that consumes its match without styling it (identifiers, punctuation runs).
    pub fn unstyled(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            style: None,
        })
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// End offset of a non-empty match starting at `pos` in `text`.
    fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        self.regex
            .find_at(text, pos)
            .filter(|m| m.start() == pos && m.end() > pos)
            .map(|m| m.end())
    }
}

/// A construct that may span lines, such as a block comment.
#[derive(Debug, Clone)]
pub struct BlockRule {
    open: Regex,
    close: Regex,
    style: String,
}

impl BlockRule {
    pub fn new(open: &str, close: &str, style: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            open: Regex::new(open)?,
            close: Regex::new(close)?,
            style: style.to_string(),
        })
    }
}

/// A simple regex-based language: ordered rules plus an optional block rule.
///
/// Rules are tried in order at each position; the first one matching at the cursor wins.
#[derive(Debug, Clone)]
pub struct RegexLanguage {
    name: String,
    rules: Vec<RegexRule>,
    block: Option<BlockRule>,
    indent_unit: Option<usize>,
}

impl RegexLanguage {
    pub fn new(name: impl Into<String>, rules: Vec<RegexRule>) -> Self {
        Self {
            name: name.into(),
            rules,
            block: None,
            indent_unit: None,
        }
    }

    /// Add a multi-line block rule, checked before the ordinary rules.
    pub fn with_block(mut self, block: BlockRule) -> Self {
        self.block = Some(block);
        self
    }

    /// Suggest `unit` columns of indentation per open bracket.
    pub fn with_indent_unit(mut self, unit: usize) -> Self {
        self.indent_unit = Some(unit);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[RegexRule] {
        &self.rules
    }

    /// A small PHP grammar.
    pub fn php_default() -> Result<Self, regex::Error> {
        Ok(Self::new(
            "php",
            vec![
                RegexRule::new(r"(?://|#).*", "comment")?,
                RegexRule::new(r#""(?:\\.|[^"\\])*"?|'(?:\\.|[^'\\])*'?"#, "string")?,
                RegexRule::new(r"\$\w+", "variable-2")?,
                RegexRule::new(NUMBER, "number")?,
                RegexRule::new(
                    r"\b(?:abstract|and|array|as|break|case|catch|class|clone|const|continue|declare|default|do|echo|else|elseif|empty|enddeclare|endfor|endforeach|endif|endswitch|endwhile|extends|final|finally|fn|for|foreach|function|global|if|implements|include|include_once|instanceof|interface|isset|list|match|namespace|new|or|print|private|protected|public|require|require_once|return|static|switch|throw|trait|try|unset|use|var|while|xor|yield)\b",
                    "keyword",
                )?,
                RegexRule::new(r"(?i)\b(?:true|false|null)\b", "atom")?,
                RegexRule::unstyled(r"\w+")?,
            ],
        )
        .with_block(BlockRule::new(r"/\*", r"\*/", "comment")?)
        .with_indent_unit(4))
    }

    /// A small HTML grammar.
    pub fn html_default() -> Result<Self, regex::Error> {
        Ok(Self::new(
            "html",
            vec![
                RegexRule::new(r"</?[A-Za-z][\w:-]*", "tag")?,
                RegexRule::new(r"/?>", "tag")?,
                RegexRule::new(r"[A-Za-z_:][\w:.-]*(?:\s*=)", "attribute")?,
                RegexRule::new(r#""[^"]*"?|'[^']*'?"#, "string")?,
                RegexRule::new(r"&(?:#\d+|#x[0-9A-Fa-f]+|\w+);", "atom")?,
                RegexRule::unstyled(r#"[^<&\s"'=/>]+"#)?,
            ],
        )
        .with_block(BlockRule::new("<!--", "-->", "comment")?)
        .with_indent_unit(2))
    }

    /// A small LaTeX grammar for math blocks.
    pub fn latex_default() -> Result<Self, regex::Error> {
        Ok(Self::new(
            "latex",
            vec![
                RegexRule::new(r"%.*", "comment")?,
                RegexRule::new(r"\\(?:[A-Za-z@]+|.)", "tag")?,
                RegexRule::new(r"[{}\[\]]", "bracket")?,
                RegexRule::new(r"\$\$?", "keyword")?,
                RegexRule::new(NUMBER, "number")?,
            ],
        ))
    }

    /// A small Java grammar.
    pub fn java_default() -> Result<Self, regex::Error> {
        Ok(Self::new(
            "java",
            vec![
                RegexRule::new(r"//.*", "comment")?,
                RegexRule::new(r#""(?:\\.|[^"\\])*"?|'(?:\\.|[^'\\])'?"#, "string")?,
                RegexRule::new(r"@\w+", "meta")?,
                RegexRule::new(NUMBER, "number")?,
                RegexRule::new(
                    r"\b(?:abstract|assert|boolean|break|byte|case|catch|char|class|const|continue|default|do|double|else|enum|extends|final|finally|float|for|goto|if|implements|import|instanceof|int|interface|long|native|new|package|private|protected|public|record|return|short|static|strictfp|super|switch|synchronized|this|throw|throws|transient|try|var|void|volatile|while)\b",
                    "keyword",
                )?,
                RegexRule::new(r"\b(?:true|false|null)\b", "atom")?,
                RegexRule::new(r"\b[A-Z]\w*", "type")?,
                RegexRule::unstyled(r"\w+")?,
            ],
        )
        .with_block(BlockRule::new(r"/\*", r"\*/", "comment")?)
        .with_indent_unit(4))
    }
}

const NUMBER: &str = r"\b(?:0[xX][0-9A-Fa-f]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)\b";

/// Per-session state of a [`RegexLanguage`].
#[derive(Debug, Clone)]
pub struct RegexDelegate {
    language: Arc<RegexLanguage>,
    in_block: bool,
    depth: usize,
}

impl RegexDelegate {
    pub fn new(language: Arc<RegexLanguage>) -> Self {
        Self {
            language,
            in_block: false,
            depth: 0,
        }
    }

    pub fn language(&self) -> &RegexLanguage {
        &self.language
    }

    /// Whether the previous line ended inside a block construct.
    pub fn in_block(&self) -> bool {
        self.in_block
    }

    fn continue_block(&mut self, block: &BlockRule, cursor: &mut LineCursor<'_>) -> Option<String> {
        let pos = cursor.pos();
        match block.close.find_at(cursor.view(), pos) {
            Some(m) => {
                cursor.advance_to(m.end());
                self.in_block = false;
            }
            None => cursor.skip_to_end(),
        }
        Some(block.style.clone())
    }
}

impl DelegateState for RegexDelegate {
    fn step(&mut self, cursor: &mut LineCursor<'_>) -> Option<String> {
        let language = Arc::clone(&self.language);
        let view = cursor.view();
        let pos = cursor.pos();

        if let Some(block) = &language.block {
            if self.in_block {
                return self.continue_block(block, cursor);
            }
            if let Some(m) = block.open.find_at(view, pos)
                && m.start() == pos
            {
                cursor.advance_to(m.end());
                self.in_block = true;
                return self.continue_block(block, cursor);
            }
        }

        for rule in &language.rules {
            if let Some(end) = rule.match_at(view, pos) {
                cursor.advance_to(end);
                return rule.style.clone();
            }
        }

        if cursor.eat_while(char::is_whitespace) {
            return None;
        }
        match cursor.next_char() {
            Some('{' | '(' | '[') => self.depth += 1,
            Some('}' | ')' | ']') => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        None
    }

    fn indent(&self, text_after: &str) -> Option<usize> {
        let unit = self.language.indent_unit?;
        let closing = text_after
            .trim_start()
            .starts_with(['}', ')', ']']);
        let depth = if closing {
            self.depth.saturating_sub(1)
        } else {
            self.depth
        };
        Some(depth * unit)
    }

    fn box_clone(&self) -> Box<dyn DelegateState> {
        Box::new(self.clone())
    }
}

/// A [`LanguageProvider`] backed by [`RegexLanguage`]s, keyed by lower-case name.
#[derive(Debug, Clone, Default)]
pub struct SimpleLanguages {
    languages: HashMap<String, Arc<RegexLanguage>>,
    aliases: HashMap<String, String>,
}

impl SimpleLanguages {
    pub fn new() -> Self {
        Self::default()
    }

    /// php, html, latex and java, plus common aliases of each.
    pub fn with_defaults() -> Result<Self, regex::Error> {
        let mut languages = Self::new();
        languages.insert(RegexLanguage::php_default()?);
        languages.insert(RegexLanguage::html_default()?);
        languages.insert(RegexLanguage::latex_default()?);
        languages.insert(RegexLanguage::java_default()?);
        for (alias, name) in [
            ("php5", "php"),
            ("html4strict", "html"),
            ("html5", "html"),
            ("xml", "html"),
            ("tex", "latex"),
            ("java5", "java"),
        ] {
            languages.alias(alias, name);
        }
        Ok(languages)
    }

    /// Register `language` under its own name.
    pub fn insert(&mut self, language: RegexLanguage) {
        self.languages
            .insert(language.name().to_lowercase(), Arc::new(language));
    }

    /// Make `alias` resolve to the language registered as `name`.
    pub fn alias(&mut self, alias: &str, name: &str) {
        self.aliases.insert(alias.to_lowercase(), name.to_lowercase());
    }

    /// Look up a language by name or alias (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Arc<RegexLanguage>> {
        let name = name.to_lowercase();
        let name = self.aliases.get(&name).unwrap_or(&name);
        self.languages.get(name)
    }
}

impl LanguageProvider for SimpleLanguages {
    fn is_known(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn start_state(&self, name: &str) -> Option<Box<dyn DelegateState>> {
        let language = self.get(name)?;
        Some(Box::new(RegexDelegate::new(Arc::clone(language))))
    }
}
