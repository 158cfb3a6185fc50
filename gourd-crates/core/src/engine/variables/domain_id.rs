use std::fmt::Display;

use super::Variable;
use super::VariableId;

/// An integer variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainId {
    pub(crate) id: VariableId,
}

impl DomainId {
    pub(crate) fn new(id: VariableId) -> Self {
        DomainId { id }
    }
}

impl Variable for DomainId {
    fn variable_id(&self) -> VariableId {
        self.id
    }
}

impl Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
