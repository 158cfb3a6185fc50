use super::DomainId;
use super::Variable;
use super::VariableId;

/// A boolean variable, backed by an integer variable with domain `{0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    domain: DomainId,
}

impl Literal {
    pub(crate) fn new(domain: DomainId) -> Literal {
        Literal { domain }
    }

    /// The underlying 0/1 integer variable.
    pub fn domain_id(&self) -> DomainId {
        self.domain
    }
}

impl Variable for Literal {
    fn variable_id(&self) -> VariableId {
        self.domain.id
    }
}
