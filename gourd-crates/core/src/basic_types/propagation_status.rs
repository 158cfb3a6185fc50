use std::borrow::Cow;

use crate::engine::variables::VariableId;
use crate::propagation::PropagatorId;

/// The result of invoking a propagator or of running the engine to a fixpoint.
pub type PropagationStatus = Result<(), Contradiction>;

/// Raised when the current partial assignment cannot be extended to a solution.
///
/// A contradiction aborts the ongoing fixpoint computation. The caller is expected to restore an
/// earlier checkpoint before propagating again.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Contradiction {
    /// A domain mutation would have left a variable without any value.
    #[error(transparent)]
    EmptyDomain(#[from] EmptyDomainConflict),
    /// A propagator detected that its constraint cannot be satisfied.
    #[error(transparent)]
    Propagator(#[from] PropagatorConflict),
}

impl Contradiction {
    /// The propagator which was running when the contradiction was detected, if any.
    pub fn propagator(&self) -> Option<PropagatorId> {
        match self {
            Contradiction::EmptyDomain(conflict) => conflict.propagator,
            Contradiction::Propagator(conflict) => Some(conflict.propagator),
        }
    }
}

/// A mutation was rejected because it would empty the domain of `variable`.
///
/// The rejected mutation is never applied; the domain is left as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("domain of {variable} would become empty: {reason}")]
pub struct EmptyDomainConflict {
    pub variable: VariableId,
    /// `None` when the mutation came from outside the engine, e.g. a search decision.
    pub propagator: Option<PropagatorId>,
    pub reason: &'static str,
}

/// A propagator reported failure explicitly.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{propagator} failed: {reason}")]
pub struct PropagatorConflict {
    pub propagator: PropagatorId,
    pub reason: Cow<'static, str>,
}
