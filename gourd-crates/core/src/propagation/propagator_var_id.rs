use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// A subscription slot: the variable with local id `variable` of `propagator`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) struct PropagatorVarId {
    pub(crate) propagator: PropagatorId,
    pub(crate) variable: LocalId,
}
