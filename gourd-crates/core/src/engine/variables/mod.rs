//! Handles to the variables of a [`State`](crate::engine::State).
//!
//! A handle is a small copyable identifier. The domain it refers to is stored in the engine; the
//! handle type only determines which operations are available on that domain.

mod domain_id;
mod graph_variable;
mod literal;
mod set_variable;

use std::fmt::Display;

pub use domain_id::DomainId;
pub use graph_variable::GraphVariable;
pub use literal::Literal;
pub use set_variable::SetVariable;

use crate::containers::StorageKey;

/// The identifier shared by all kinds of variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId {
    id: u32,
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId { id: index as u32 }
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.id)
    }
}

/// Implemented by every variable handle, so that subscriptions and the generic queries of the
/// engine can be expressed once.
pub trait Variable: Copy {
    fn variable_id(&self) -> VariableId;
}

impl Variable for VariableId {
    fn variable_id(&self) -> VariableId {
        *self
    }
}
