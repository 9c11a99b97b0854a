//! Dialogue node definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::triggers::DialogueAction;
use game_facts::Condition;

/// Unique identifier for dialogue nodes.
///
/// Identity is a stable string - the only cross-reference mechanism between
/// nodes - so graphs can be serialized and edited without direct in-memory
/// references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Mint a fresh random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who speaks a node's line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeakerRole {
    Player,
    NonPlayer,
}

/// One line of dialogue and its outgoing edges.
///
/// Read-only from the traversal engine's perspective; only the owning
/// [`Dialogue`](crate::graph::Dialogue) mutates nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: NodeId,

    /// Display text for this line.
    pub text: String,

    pub role: SpeakerRole,

    /// Child order is the traversal tie-break.
    #[serde(default)]
    pub children: Vec<NodeId>,

    /// Action symbols fired when the cursor enters this node, in order.
    #[serde(default)]
    pub on_enter: Vec<DialogueAction>,

    /// Action symbols fired when the cursor leaves this node, in order.
    #[serde(default)]
    pub on_exit: Vec<DialogueAction>,

    /// Gate on the edge leading into this node. Defaults to always true.
    #[serde(default)]
    pub condition: Condition,

    /// Opaque editor data (layout and the like). Ignored by traversal,
    /// round-tripped by serialization.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl DialogueNode {
    /// Create a node with a freshly minted ID and no children.
    pub fn new(text: impl Into<String>, role: SpeakerRole) -> Self {
        Self {
            id: NodeId::new(),
            text: text.into(),
            role,
            children: Vec::new(),
            on_enter: Vec::new(),
            on_exit: Vec::new(),
            condition: Condition::always(),
            metadata: HashMap::new(),
        }
    }

    /// Replace the minted ID with a stable one.
    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = id.into();
        self
    }

    /// Append a child edge.
    pub fn with_child(mut self, id: impl Into<NodeId>) -> Self {
        self.children.push(id.into());
        self
    }

    /// Append an enter action.
    pub fn with_on_enter(mut self, action: DialogueAction) -> Self {
        self.on_enter.push(action);
        self
    }

    /// Append an exit action.
    pub fn with_on_exit(mut self, action: DialogueAction) -> Self {
        self.on_exit.push(action);
        self
    }

    /// Attach the gating condition.
    pub fn with_condition(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = condition.into();
        self
    }

    /// Attach an opaque metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_player_speaking(&self) -> bool {
        self.role == SpeakerRole::Player
    }
}
