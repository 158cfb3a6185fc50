use super::Variable;
use super::VariableId;

/// A variable whose value is a graph over a fixed vertex set `0..n`.
///
/// Like a [`SetVariable`](super::SetVariable), its domain is bounded by a kernel graph and an
/// envelope graph; the elements are arcs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphVariable {
    pub(crate) id: VariableId,
}

impl Variable for GraphVariable {
    fn variable_id(&self) -> VariableId {
        self.id
    }
}
