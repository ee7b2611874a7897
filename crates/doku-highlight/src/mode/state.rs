use crate::mode::delegate::ActiveDelegate;
use crate::mode::graph::{ModeGraph, ModeId};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Flags a custom step keeps across successive calls on the same construct.
pub enum ScratchFlag {
    /// Inside the title part of a link or media reference.
    LinkTitle,
    /// Inside the `?params` part of a media reference.
    LinkParam,
    /// The `<code>` filename parameter has been seen.
    CodeFilename,
    /// Inside a flag/parameter list (include, vshare, orphanswanted).
    IsLink,
    /// Inside the title part of a vshare reference.
    IsString,
    /// Inside an icon parameter list.
    IsAttr,
    /// Inside a `[name=value]` extended attribute.
    IsExtAttr,
}

/// Small scratch storage for custom steps.
///
/// Cleared whenever a mode with a custom step is popped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scratch {
    flags: BTreeSet<ScratchFlag>,
    code_lang: Option<String>,
}

impl Scratch {
    /// Whether `flag` is set.
    pub fn is_set(&self, flag: ScratchFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Set or clear `flag`.
    pub fn set(&mut self, flag: ScratchFlag, value: bool) {
        if value {
            self.flags.insert(flag);
        } else {
            self.flags.remove(&flag);
        }
    }

    /// Language named by the pending `<code>` parameters.
    pub fn code_lang(&self) -> Option<&str> {
        self.code_lang.as_deref()
    }

    pub(crate) fn set_code_lang(&mut self, lang: Option<String>) {
        self.code_lang = lang;
    }

    pub(crate) fn take_code_lang(&mut self) -> Option<String> {
        self.code_lang.take()
    }

    /// Reset every flag.
    pub fn clear(&mut self) {
        self.flags.clear();
        self.code_lang = None;
    }
}

#[derive(Debug, Clone)]
struct Frame {
    mode: ModeId,
    /// Allowed list of a derived (push template) frame. `None` uses the graph's list.
    allowed: Option<Arc<[ModeId]>>,
}

/// Per-session tokenizer state: the mode stack, the pending exit flag, the active delegate and
/// custom-step scratch.
///
/// Cloning deep-copies the stack, the scratch and the delegate state, so a clone can be stepped
/// independently of the state it was cloned from.
#[derive(Debug, Clone)]
pub struct State {
    frames: Vec<Frame>,
    pending_exit: bool,
    delegate: Option<ActiveDelegate>,
    scratch: Scratch,
}

impl State {
    /// A fresh state whose stack holds only `base`.
    pub fn new(base: ModeId) -> Self {
        Self {
            frames: vec![Frame {
                mode: base,
                allowed: None,
            }],
            pending_exit: false,
            delegate: None,
            scratch: Scratch::default(),
        }
    }

    /// The active mode (top of the stack).
    pub fn current(&self) -> ModeId {
        self.top().mode
    }

    /// Number of frames on the stack (1 at the base).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Modes on the stack, outermost first.
    pub fn modes(&self) -> impl Iterator<Item = ModeId> + '_ {
        self.frames.iter().map(|f| f.mode)
    }

    /// Whether the previous token matched an exit pattern that has not been processed yet.
    pub fn is_exit_pending(&self) -> bool {
        self.pending_exit
    }

    /// The active embedded-language delegate, if any.
    pub fn delegate(&self) -> Option<&ActiveDelegate> {
        self.delegate.as_ref()
    }

    /// Custom-step scratch flags.
    pub fn scratch(&self) -> &Scratch {
        &self.scratch
    }

    /// Whether the stack and flags match `other`. Delegate states are opaque and only compared
    /// by language.
    pub fn same_position(&self, other: &State) -> bool {
        self.pending_exit == other.pending_exit
            && self.scratch == other.scratch
            && self.frames.len() == other.frames.len()
            && self
                .frames
                .iter()
                .zip(&other.frames)
                .all(|(a, b)| a.mode == b.mode && a.allowed == b.allowed)
            && self.delegate.as_ref().map(ActiveDelegate::language)
                == other.delegate.as_ref().map(ActiveDelegate::language)
    }

    /// Modes reachable from the active frame.
    pub(crate) fn allowed(&self, graph: &ModeGraph) -> Arc<[ModeId]> {
        let top = self.top();
        match &top.allowed {
            Some(list) => list.clone(),
            None => graph.allowed(top.mode).clone(),
        }
    }

    pub(crate) fn push(&mut self, mode: ModeId) {
        self.frames.push(Frame {
            mode,
            allowed: None,
        });
    }

    pub(crate) fn push_derived(&mut self, template: ModeId, allowed: Arc<[ModeId]>) {
        self.frames.push(Frame {
            mode: template,
            allowed: Some(allowed),
        });
    }

    pub(crate) fn set_pending_exit(&mut self) {
        self.pending_exit = true;
    }

    /// Tear down the delegate, pop the top frame and clear the pending exit.
    ///
    /// The base frame is never popped.
    pub(crate) fn exit(&mut self, graph: &ModeGraph) {
        self.pending_exit = false;
        self.pop(graph);
    }

    /// Pop the top frame without touching the pending exit flag.
    pub(crate) fn pop(&mut self, graph: &ModeGraph) {
        if self.frames.len() <= 1 {
            return;
        }
        self.delegate = None;
        if let Some(frame) = self.frames.pop()
            && graph.mode(frame.mode).step.is_some()
        {
            self.scratch.clear();
        }
    }

    pub(crate) fn set_delegate(&mut self, delegate: ActiveDelegate) {
        self.delegate = Some(delegate);
    }

    pub(crate) fn delegate_mut(&mut self) -> Option<&mut ActiveDelegate> {
        self.delegate.as_mut()
    }

    pub(crate) fn scratch_mut(&mut self) -> &mut Scratch {
        &mut self.scratch
    }

    fn top(&self) -> &Frame {
        // The base frame is never popped, so the stack is never empty.
        &self.frames[self.frames.len() - 1]
    }
}
