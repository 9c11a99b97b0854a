//! Action dispatch protocol - named symbols fired when the conversation
//! enters or exits a node, resolved against the active conversant's bindings.

use serde::{Deserialize, Serialize};

/// All action symbols dialogue authors can attach to a node's enter/exit
/// lists.
///
/// Which effects a symbol produces is entirely up to the bindings registered
/// on the conversant; symbols no binding handles are silently ignored so
/// authors may reference actions ahead of their implementation.
/// [`DialogueAction::None`] is the authoring placeholder and is never
/// dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DialogueAction {
    #[default]
    None,
    NameChange,
    NameReset,
    SpriteChange,
    SpriteReset,
    MoodChange,
    MoodReset,
    TextSizeChange,
    TextColorChange,
    TextReset,
    PlaySound,
}

/// One (action symbol, effect) binding.
pub struct Trigger {
    action: DialogueAction,
    effect: Box<dyn FnMut()>,
}

impl Trigger {
    pub fn new(action: DialogueAction, effect: impl FnMut() + 'static) -> Self {
        Self {
            action,
            effect: Box::new(effect),
        }
    }

    pub fn action(&self) -> DialogueAction {
        self.action
    }

    /// Invoke the effect when the fired symbol matches the bound one.
    pub fn fire(&mut self, action: DialogueAction) {
        if action == self.action {
            (self.effect)();
        }
    }
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of a conversant's action bindings.
///
/// Multiple bindings may share a symbol; they all fire, in registration
/// order.
#[derive(Debug, Default)]
pub struct TriggerSet {
    triggers: Vec<Trigger>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an effect for an action symbol.
    pub fn bind(&mut self, action: DialogueAction, effect: impl FnMut() + 'static) {
        self.triggers.push(Trigger::new(action, effect));
    }

    /// Broadcast a symbol to every binding; unmatched symbols are ignored.
    pub fn dispatch(&mut self, action: DialogueAction) {
        for trigger in &mut self.triggers {
            trigger.fire(action);
        }
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
