//! Error types for dialogue loading and traversal.

use thiserror::Error;

use crate::conversation::ConversationState;
use crate::graph::NodeId;

/// Errors surfaced by graph construction and conversation operations.
///
/// Dangling child references and unrecognized predicate kinds are *not*
/// errors; they degrade gracefully (omitted child, unknown fact).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    /// A dialogue graph must hold at least one node, and its designated root
    /// must resolve. Fatal at load time, before any session starts.
    #[error("dialogue graph has no usable root node")]
    EmptyGraph,

    /// An operation was called in a state that forbids it. Recoverable by
    /// correcting the call sequence.
    #[error("{operation} is not valid while the conversation is {state}")]
    InvalidState {
        operation: &'static str,
        state: ConversationState,
    },

    /// A previously offered choice is no longer condition-eligible.
    /// Recoverable by re-querying the current choices.
    #[error("choice {chosen} is no longer available")]
    StaleChoice { chosen: NodeId },
}
