//! Dialogue graph - identifier-indexed conversation nodes with a designated
//! root.

mod node;

pub use node::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::DialogueError;

/// A complete conversation asset: a node mapping plus a designated root.
///
/// The traversal engine treats the graph as read-only; the owning editor
/// surface mutates it through [`Dialogue::insert`] and [`Dialogue::remove`].
/// Child identifiers that resolve to no node are tolerated and silently
/// omitted from lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DialogueData", into = "DialogueData")]
pub struct Dialogue {
    nodes: HashMap<NodeId, DialogueNode>,
    root: NodeId,
}

/// Serialized form of a [`Dialogue`], as produced by loaders and editors.
#[derive(Serialize, Deserialize)]
struct DialogueData {
    root: NodeId,
    nodes: Vec<DialogueNode>,
}

impl TryFrom<DialogueData> for Dialogue {
    type Error = DialogueError;

    fn try_from(data: DialogueData) -> Result<Self, Self::Error> {
        Dialogue::new(data.root, data.nodes)
    }
}

impl From<Dialogue> for DialogueData {
    fn from(dialogue: Dialogue) -> Self {
        Self {
            root: dialogue.root,
            nodes: dialogue.nodes.into_values().collect(),
        }
    }
}

impl Dialogue {
    /// Build a graph from its nodes and designated root.
    ///
    /// Fails with [`DialogueError::EmptyGraph`] when no nodes are given or
    /// the root identifier resolves to none of them - a graph must be usable
    /// before any session starts, so this is checked at construction rather
    /// than at traversal time.
    pub fn new(
        root: impl Into<NodeId>,
        nodes: impl IntoIterator<Item = DialogueNode>,
    ) -> Result<Self, DialogueError> {
        let root = root.into();
        let nodes: HashMap<_, _> = nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();

        if !nodes.contains_key(&root) {
            return Err(DialogueError::EmptyGraph);
        }

        Ok(Self { nodes, root })
    }

    /// The designated root identifier.
    pub fn root(&self) -> &NodeId {
        &self.root
    }

    /// Look up a node by identifier.
    pub fn get(&self, id: &NodeId) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Resolved children of a node, in authoring order.
    ///
    /// Dangling child identifiers are omitted, not surfaced as errors.
    pub fn children(&self, id: &NodeId) -> Vec<&DialogueNode> {
        self.nodes
            .get(id)
            .map(|parent| {
                parent
                    .children
                    .iter()
                    .filter_map(|child| self.nodes.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Children filtered to one speaker role, relative order preserved.
    pub fn children_by_role(&self, id: &NodeId, role: SpeakerRole) -> Vec<&DialogueNode> {
        self.children(id)
            .into_iter()
            .filter(|child| child.role == role)
            .collect()
    }

    /// Iterate all nodes in the graph.
    pub fn nodes(&self) -> impl Iterator<Item = &DialogueNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add or replace a node. Owner-side editing operation.
    pub fn insert(&mut self, node: DialogueNode) -> NodeId {
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Remove a node and scrub its identifier from every remaining child
    /// list, keeping the graph referentially clean. Owner-side editing
    /// operation.
    ///
    /// The root cannot be removed (the graph must keep a usable root);
    /// asking to returns `None` and leaves the graph untouched.
    pub fn remove(&mut self, id: &NodeId) -> Option<DialogueNode> {
        if *id == self.root {
            return None;
        }
        let removed = self.nodes.remove(id)?;
        for node in self.nodes.values_mut() {
            node.children.retain(|child| child != id);
        }
        Some(removed)
    }
}
