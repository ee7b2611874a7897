//! Built-in mode tables.

mod base;
mod plugins;
pub(crate) mod words;

pub use base::dokuwiki;
pub use plugins::{PLUGINS, is_supported, plugins};
pub use words::{email_link_regex, external_link_regex, file_link_regex, words_regex};
