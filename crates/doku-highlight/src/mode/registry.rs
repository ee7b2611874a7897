use crate::mode::compiler::{Mode, compile_mode};
use crate::mode::definition::ModeDefinition;
use crate::mode::error::ModeError;
use crate::mode::graph::ModeId;
use std::collections::HashMap;

/// Collects mode definitions before they are compiled into a [`ModeRegistry`].
///
/// Optional rule groups are added with [`RegistryBuilder::group_if`], so the finished registry is
/// a plain value with no further mutation.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    modes: Vec<ModeDefinition>,
    templates: Vec<ModeDefinition>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mode.
    pub fn mode(mut self, definition: ModeDefinition) -> Self {
        self.modes.push(definition);
        self
    }

    /// Register several modes in order.
    pub fn modes(mut self, definitions: impl IntoIterator<Item = ModeDefinition>) -> Self {
        self.modes.extend(definitions);
        self
    }

    /// Register a push template: a reusable sub-mode activated by a pattern's `push`.
    ///
    /// Templates are not part of the priority walk; they only become active through `push`.
    pub fn template(mut self, definition: ModeDefinition) -> Self {
        self.templates.push(definition);
        self
    }

    /// Apply `group` only when `enabled` is true.
    pub fn group_if(self, enabled: bool, group: impl FnOnce(Self) -> Self) -> Self {
        if enabled { group(self) } else { self }
    }

    /// Number of registered (non-template) modes.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Whether no modes have been registered.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Sort by priority (stable, so registration order breaks ties) and compile every pattern.
    ///
    /// The first registered mode is the base mode. It keeps index 0 whatever its priority, so
    /// only the modes after it are sorted.
    pub fn build(mut self) -> Result<ModeRegistry, ModeError> {
        if self.modes.is_empty() {
            return Err(ModeError::EmptyRegistry);
        }

        self.modes[1..].sort_by_key(|m| m.priority);

        let walk_len = self.modes.len();
        let template_ids: HashMap<String, ModeId> = self
            .templates
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), ModeId(walk_len + i)))
            .collect();

        let modes = self
            .modes
            .iter()
            .chain(self.templates.iter())
            .enumerate()
            .map(|(i, def)| compile_mode(ModeId(i), def, &template_ids))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ModeRegistry { modes, walk_len })
    }
}

/// The finished, immutable set of modes in priority order.
///
/// The first registered mode is the base mode and stays first. Push templates follow the
/// registered modes and are excluded from [`ModeRegistry::ordered`].
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    modes: Vec<Mode>,
    walk_len: usize,
}

impl ModeRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registered modes in priority order (templates excluded).
    pub fn ordered(&self) -> &[Mode] {
        &self.modes[..self.walk_len]
    }

    /// Push templates.
    pub fn templates(&self) -> &[Mode] {
        &self.modes[self.walk_len..]
    }

    /// Every mode, indexable by [`ModeId`].
    pub fn all(&self) -> &[Mode] {
        &self.modes
    }

    /// The base mode.
    pub fn base(&self) -> &Mode {
        &self.modes[0]
    }

    /// Look up the first registered mode with `name`.
    pub fn find(&self, name: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.name == name)
    }

    pub(crate) fn into_modes(self) -> (Vec<Mode>, usize) {
        (self.modes, self.walk_len)
    }
}
