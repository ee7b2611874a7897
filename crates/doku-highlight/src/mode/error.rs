use crate::mode::definition::ModeType;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading configuration and building the mode registry/graph.
///
/// Every variant is a build-time failure. Tokenizing never fails once a
/// [`ModeGraph`](crate::mode::ModeGraph) exists.
pub enum ModeError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("registry contains no modes")]
    /// A registry must contain at least the base mode.
    EmptyRegistry,

    #[error("regex compile error for pattern '{pattern}': {message}")]
    /// A regex pattern failed to compile.
    RegexCompile {
        /// The regex pattern string.
        pattern: String,
        /// The compiler error message.
        message: String,
    },

    #[error("invalid pattern in mode '{mode}': {reason}")]
    /// A pattern definition is malformed (e.g. both `literal` and `regex` set).
    InvalidPattern {
        /// Name of the mode owning the pattern.
        mode: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    #[error("mode '{mode}' pushes unknown template '{template}'")]
    /// A `push` reference does not name a registered template.
    UnknownTemplate {
        /// Name of the mode owning the pattern.
        mode: String,
        /// The unresolved template name.
        template: String,
    },

    #[error("mode '{mode}' permits type '{kind:?}' but no mode has that type")]
    /// A permitted type tag matches no registered mode.
    UnmatchedPermittedType {
        /// Name of the offending mode.
        mode: String,
        /// The type tag without any matching modes.
        kind: ModeType,
    },
}
