//! # Dialogue Core (Parley)
//!
//! The conversation engine: a directed graph of dialogue nodes, conditional
//! edge filtering through `game_facts`, and the state machine that walks the
//! graph while firing authored actions and notifying observers.
//!
//! ## Core Components
//!
//! - **graph**: Identifier-indexed [`Dialogue`] graphs and their
//!   [`DialogueNode`]s
//! - **conversation**: The [`Conversation`] state machine driving a live
//!   session
//! - **triggers**: The action dispatch protocol - [`DialogueAction`] symbols
//!   resolved against a conversant's [`TriggerSet`]
//!
//! ## Design Philosophy
//!
//! - **Identifier Edges**: Nodes reference children by stable string ID, never
//!   by direct reference, so graphs stay safely editable and serializable
//! - **Caller-Driven**: Advancement happens only on explicit calls; the engine
//!   owns no clock and delivers every notification synchronously
//! - **Graceful Degradation**: Dangling child IDs and unrecognized predicates
//!   degrade silently; only genuine contract violations surface as errors

pub mod conversation;
pub mod error;
pub mod graph;
pub mod triggers;

pub use conversation::*;
pub use error::*;
pub use graph::*;
pub use triggers::*;
