//! Predicate vocabulary and the fact-provider interface.

use serde::{Deserialize, Serialize};

/// Tri-state answer a fact provider gives to a predicate query.
///
/// [`Truth::Unknown`] means the provider has no opinion on the predicate.
/// It is never treated as [`Truth::False`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Truth {
    True,
    False,
    #[default]
    Unknown,
}

impl Truth {
    /// The opinionated value carried by this answer, if any.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Truth::True => Some(true),
            Truth::False => Some(false),
            Truth::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        self == Truth::Unknown
    }
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value {
            Truth::True
        } else {
            Truth::False
        }
    }
}

impl From<Option<bool>> for Truth {
    fn from(value: Option<bool>) -> Self {
        value.map(Truth::from).unwrap_or(Truth::Unknown)
    }
}

/// All predicates available to use in conditions.
///
/// Answered by various external systems like quests, inventory and
/// relationships. Add/subtract as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredicateKind {
    Select,
    HasQuest,
    HasCompletedQuest,
    HasItem,
    HasMet,
    IsFriend,
    IsEnemy,
    IsInRelationship,
}

/// A fact provider consulted during condition evaluation.
///
/// Providers are handed to the evaluation call as an ordered list; the order
/// is chosen by the caller and determines veto precedence. A provider that
/// does not recognize a predicate (or its parameters) answers
/// [`Truth::Unknown`] - malformed queries are not errors.
pub trait PredicateEvaluator {
    fn evaluate(&self, kind: PredicateKind, parameters: &[String]) -> Truth;
}
