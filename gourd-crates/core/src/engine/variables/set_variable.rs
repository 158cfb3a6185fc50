use super::Variable;
use super::VariableId;

/// A variable whose value is a finite set of integers.
///
/// Its domain is the lattice interval between a kernel (values which are certainly in the set)
/// and an envelope (values which may be in the set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SetVariable {
    pub(crate) id: VariableId,
}

impl Variable for SetVariable {
    fn variable_id(&self) -> VariableId {
        self.id
    }
}
