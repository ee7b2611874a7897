use crate::mode::compiler::Mode;
use crate::mode::error::ModeError;
use crate::mode::registry::ModeRegistry;
use crate::mode::steps::StepMatchers;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Index of a [`Mode`] inside a [`ModeGraph`].
pub struct ModeId(pub(crate) usize);

impl ModeId {
    /// The raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Every mode plus, for each, the ordered list of modes it may transition into.
///
/// Built once from a [`ModeRegistry`] and shared read-only by all tokenizer sessions.
#[derive(Debug)]
pub struct ModeGraph {
    modes: Vec<Mode>,
    walk_len: usize,
    allowed: Vec<Arc<[ModeId]>>,
    steps: StepMatchers,
}

impl ModeGraph {
    /// Build the graph.
    ///
    /// For a leaf mode the allowed list is just the mode itself. Otherwise it is every registered
    /// mode whose type it permits plus the mode itself, all in priority order, so a permitted
    /// child with a lower priority number is tried before the mode's own patterns.
    ///
    /// Fails if a mode permits a type that no registered mode has.
    pub fn build(registry: ModeRegistry) -> Result<Self, ModeError> {
        let (modes, walk_len) = registry.into_modes();
        let ordered = &modes[..walk_len];

        let mut allowed = Vec::with_capacity(modes.len());
        for mode in &modes {
            let Some(types) = &mode.allows else {
                allowed.push(Arc::from([mode.id]));
                continue;
            };

            for &kind in types {
                if !ordered.iter().any(|m| m.kind == Some(kind)) {
                    return Err(ModeError::UnmatchedPermittedType {
                        mode: mode.name.clone(),
                        kind,
                    });
                }
            }

            let list: Arc<[ModeId]> = ordered
                .iter()
                .filter(|m| m.id == mode.id || m.kind.is_some_and(|k| mode.permits(k)))
                .map(|m| m.id)
                .collect();
            allowed.push(list);
        }

        let graph = Self {
            modes,
            walk_len,
            allowed,
            steps: StepMatchers::compile()?,
        };
        log::debug!(
            "built mode graph: {} modes, {} push templates",
            graph.walk_len,
            graph.modes.len() - graph.walk_len
        );
        Ok(graph)
    }

    /// The base mode (bottom of every stack).
    pub fn base(&self) -> ModeId {
        ModeId(0)
    }

    /// Look up a mode by id.
    pub fn mode(&self, id: ModeId) -> &Mode {
        &self.modes[id.0]
    }

    /// Registered modes in priority order (push templates excluded).
    pub fn ordered(&self) -> &[Mode] {
        &self.modes[..self.walk_len]
    }

    /// Look up the first mode named `name`.
    pub fn find(&self, name: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.name == name)
    }

    /// Modes reachable from `id`, itself included, in priority order.
    pub fn allowed(&self, id: ModeId) -> &Arc<[ModeId]> {
        &self.allowed[id.0]
    }

    /// Whether a transition from `from` into `to` is legal.
    pub fn can_enter(&self, from: ModeId, to: ModeId) -> bool {
        self.allowed[from.0].contains(&to)
    }

    pub(crate) fn step_matchers(&self) -> &StepMatchers {
        &self.steps
    }
}
