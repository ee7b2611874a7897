//! Build-time configuration: word lists, toggles, enabled plugins and extra modes.

use crate::mode::{
    LanguageProvider, ModeDefinition, ModeError, ModeGraph, ModeRegistry, RegistryBuilder,
    Tokenizer,
};
use crate::rules;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// URL schemes recognized by a stock DokuWiki install.
pub const DEFAULT_SCHEMES: &[&str] = &[
    "http", "https", "telnet", "gopher", "wais", "ftp", "ed2k", "irc", "ldap",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Everything the host supplies before the mode graph is built.
///
/// Typically loaded from YAML:
///
/// ```yaml
/// extensions: [struct_table, wrap]
/// acronyms: [FAQ, HTML]
/// camelcase: true
/// ```
pub struct HighlightConfig {
    /// Enabled syntax plugins. Component suffixes (`struct_table`) are accepted and reduced to the
    /// plugin name (`struct`).
    pub extensions: BTreeSet<String>,
    /// Acronyms highlighted as keywords.
    pub acronyms: Vec<String>,
    /// Smiley texts highlighted as keywords.
    pub smileys: Vec<String>,
    /// Character entity texts highlighted as keywords.
    pub entities: Vec<String>,
    /// URL schemes recognized as external links.
    pub schemes: Vec<String>,
    /// Highlight implicit CamelCase links.
    pub camelcase: bool,
    /// Extra modes registered after the built-in ones.
    pub modes: Vec<ModeDefinition>,
    /// Extra push templates.
    pub templates: Vec<ModeDefinition>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            extensions: BTreeSet::new(),
            acronyms: Vec::new(),
            smileys: Vec::new(),
            entities: Vec::new(),
            schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
            camelcase: false,
            modes: Vec::new(),
            templates: Vec::new(),
        }
    }
}

impl HighlightConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ModeError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModeError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Whether the plugin `name` is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| plugin_name(e) == name)
    }

    /// Acronyms ordered longest first, so the longest alternative wins.
    pub fn sorted_acronyms(&self) -> Vec<String> {
        let mut acronyms = self.acronyms.clone();
        acronyms.sort_by(|a, b| b.len().cmp(&a.len()));
        acronyms
    }

    /// Collect the built-in modes, enabled plugins and extra modes.
    pub fn registry_builder(&self) -> RegistryBuilder {
        for name in &self.extensions {
            if !rules::is_supported(plugin_name(name)) {
                log::debug!("no highlighting rules for plugin {name:?}");
            }
        }

        let builder = rules::dokuwiki(RegistryBuilder::new(), self);
        let builder = rules::plugins(builder, |name| self.is_enabled(name));
        let builder = builder.modes(self.modes.iter().cloned());
        self.templates
            .iter()
            .cloned()
            .fold(builder, RegistryBuilder::template)
    }

    /// Build the mode registry.
    pub fn build_registry(&self) -> Result<ModeRegistry, ModeError> {
        let registry = self.registry_builder().build()?;
        log::debug!(
            "built mode registry: {} modes, {} templates, extensions {:?}",
            registry.ordered().len(),
            registry.templates().len(),
            self.extensions
        );
        Ok(registry)
    }

    /// Build the mode graph.
    pub fn build_graph(&self) -> Result<ModeGraph, ModeError> {
        ModeGraph::build(self.build_registry()?)
    }

    /// Build a tokenizer resolving embedded languages through `languages`.
    pub fn tokenizer(&self, languages: Arc<dyn LanguageProvider>) -> Result<Tokenizer, ModeError> {
        Ok(Tokenizer::new(Arc::new(self.build_graph()?), languages))
    }
}

fn plugin_name(name: &str) -> &str {
    name.split_once('_').map_or(name, |(plugin, _)| plugin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds() {
        let config = HighlightConfig::default();
        assert_eq!(config.schemes.len(), DEFAULT_SCHEMES.len());
        let graph = config.build_graph().unwrap();
        assert_eq!(graph.ordered()[0].name, "base");
        assert!(graph.find("smiley").is_none());
        assert!(graph.find("camelcaselink").is_none());
        assert!(graph.find("externallink").is_some());
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
extensions: [struct_table, comment, nosuchplugin]
acronyms: [FAQ, HTML5, A]
smileys: [":-)"]
camelcase: true
modes:
  - name: wrap
    priority: 195
    kind: formatting
    allows: [formatting, substition]
    entries:
      - literal: '<wrap>'
        style: tag
    patterns:
      - literal: '</wrap>'
        style: tag
        exit: true
"#;
        let config = HighlightConfig::from_yaml_str(yaml).unwrap();
        assert!(config.is_enabled("struct"));
        assert!(config.is_enabled("comment"));
        assert!(!config.is_enabled("info"));
        assert_eq!(config.sorted_acronyms(), ["HTML5", "FAQ", "A"]);

        let graph = config.build_graph().unwrap();
        for name in ["struct_table", "plugin_comment", "wrap", "smiley", "camelcaselink"] {
            assert!(graph.find(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = HighlightConfig::from_yaml_str("plugins: [info]").unwrap_err();
        assert!(matches!(err, ModeError::Yaml(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = HighlightConfig::from_path("/nonexistent/doku-highlight.yaml").unwrap_err();
        assert!(matches!(err, ModeError::Io(_)));
    }
}
