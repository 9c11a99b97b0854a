//! Speaker entities taking part in a conversation.

use serde::{Deserialize, Serialize};

use crate::triggers::{DialogueAction, TriggerSet};

/// Moods a speaker can present to the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
}

/// The non-player side of a conversation: a display identity plus the action
/// bindings dialogue nodes fire into while this speaker holds the session.
#[derive(Debug, Default)]
pub struct Conversant {
    name: String,
    mood: Emotion,
    triggers: TriggerSet,
}

impl Conversant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mood: Emotion::Neutral,
            triggers: TriggerSet::new(),
        }
    }

    /// Register an action binding; bindings fire in registration order.
    pub fn with_trigger(mut self, action: DialogueAction, effect: impl FnMut() + 'static) -> Self {
        self.triggers.bind(action, effect);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn mood(&self) -> Emotion {
        self.mood
    }

    pub fn set_mood(&mut self, mood: Emotion) {
        self.mood = mood;
    }

    pub fn triggers(&self) -> &TriggerSet {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut TriggerSet {
        &mut self.triggers
    }
}
