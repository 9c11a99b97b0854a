//! Condition expressions - the gating language on dialogue branches.
//!
//! A [`Condition`] is a conjunction of [`Disjunction`]s; each disjunction is
//! an OR-group of negatable [`Predicate`]s. Evaluation consults an ordered
//! list of fact providers:
//!
//! 1. Providers answering [`Truth::Unknown`] are skipped
//! 2. Any provider whose boolean answer equals the predicate's `negate` flag
//!    vetoes the predicate to false
//! 3. A predicate that survives the whole provider list un-vetoed is true
//!
//! Absence of evidence is satisfaction, not failure: a predicate no provider
//! has an opinion on evaluates to true. Dialogue graphs rely on that default
//! to keep unconditioned branches reachable with any mix of providers.

use serde::{Deserialize, Serialize};

use crate::predicates::{PredicateEvaluator, PredicateKind};

/// A named, parameterized fact query, optionally negated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub kind: PredicateKind,

    /// Parameter order is meaningful to the answering provider.
    #[serde(default)]
    pub parameters: Vec<String>,

    #[serde(default)]
    pub negate: bool,
}

impl Predicate {
    /// Create a predicate with no parameters and no negation.
    pub fn new(kind: PredicateKind) -> Self {
        Self {
            kind,
            parameters: Vec::new(),
            negate: false,
        }
    }

    /// Append a parameter.
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    /// Append multiple parameters.
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.extend(parameters.into_iter().map(Into::into));
        self
    }

    /// Flip the predicate's polarity.
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Resolve the predicate against the providers, in order.
    ///
    /// True unless some opinionated provider vetoes it.
    pub fn evaluate(&self, evaluators: &[&dyn PredicateEvaluator]) -> bool {
        for evaluator in evaluators {
            let Some(answer) = evaluator.evaluate(self.kind, &self.parameters).to_bool() else {
                continue;
            };
            if answer == self.negate {
                return false;
            }
        }
        true
    }
}

/// An OR-group of predicates. Empty groups are vacuously false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Disjunction {
    #[serde(default)]
    pub or: Vec<Predicate>,
}

impl Disjunction {
    pub fn new(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self {
            or: predicates.into_iter().collect(),
        }
    }

    /// True iff at least one predicate is true.
    pub fn evaluate(&self, evaluators: &[&dyn PredicateEvaluator]) -> bool {
        self.or.iter().any(|predicate| predicate.evaluate(evaluators))
    }
}

/// The full gating expression on a dialogue branch: an AND-group of
/// disjunctions. The empty condition is vacuously true, which makes it the
/// [`Default`] for unconditioned branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Condition {
    #[serde(default)]
    pub and: Vec<Disjunction>,
}

impl Condition {
    /// The vacuously true condition.
    pub fn always() -> Self {
        Self::default()
    }

    pub fn new(disjunctions: impl IntoIterator<Item = Disjunction>) -> Self {
        Self {
            and: disjunctions.into_iter().collect(),
        }
    }

    /// A condition requiring a single predicate.
    pub fn single(predicate: Predicate) -> Self {
        Self::new([Disjunction::new([predicate])])
    }

    /// True iff every disjunction is true.
    pub fn evaluate(&self, evaluators: &[&dyn PredicateEvaluator]) -> bool {
        self.and
            .iter()
            .all(|disjunction| disjunction.evaluate(evaluators))
    }
}

impl From<Predicate> for Condition {
    fn from(predicate: Predicate) -> Self {
        Condition::single(predicate)
    }
}
