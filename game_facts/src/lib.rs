//! # Game Facts
//!
//! The "fact vocabulary" crate - the predicate types answered by external
//! game systems and the boolean condition language built on top of them.
//! This crate is the single source of truth for how dialogue branches are
//! gated and does not know anything about dialogue graphs or conversations.
//!
//! ## Core Components
//!
//! - **predicates**: The closed predicate vocabulary, the tri-state [`Truth`]
//!   value, and the [`PredicateEvaluator`] trait implemented by fact providers
//! - **conditions**: [`Condition`] expressions (AND of OR of negatable
//!   predicates) and their evaluation against an ordered provider list
//!
//! ## Design Philosophy
//!
//! - **Provider-Agnostic**: Conditions never know where facts come from;
//!   quests, inventory, and relationship systems plug in behind one trait
//! - **Tri-State**: "No opinion" is a first-class answer and is never
//!   conflated with "false"
//! - **Pure**: Evaluating a condition has no side effects and is repeatable

pub mod conditions;
pub mod predicates;

pub use conditions::*;
pub use predicates::*;
