use crate::engine::variables::VariableId;

/// Errors which are reported while building a model, before any propagation happens.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("lower bound {lower_bound} is larger than upper bound {upper_bound}")]
    InvalidBounds { lower_bound: i32, upper_bound: i32 },
    #[error("a domain spanning {width} values is too large to be enumerated")]
    DomainTooLarge { width: u64 },
    #[error("kernel value {0} is not part of the envelope")]
    KernelNotInEnvelope(i32),
    #[error("kernel arc ({0}, {1}) is not part of the envelope")]
    KernelArcNotInEnvelope(usize, usize),
    #[error("vertex {vertex} does not exist in a graph with {num_vertices} vertices")]
    VertexOutOfRange { vertex: usize, num_vertices: usize },
    #[error("expected {expected} variables, got {actual}")]
    ScopeMismatch { expected: usize, actual: usize },
    #[error("tuple {index} has {actual} values, but the table has arity {expected}")]
    TupleArity {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("the cross product of the variable domains cannot be addressed by a table")]
    TableAddressOverflow,
    #[error("{num_literals} literals starting at value {offset} exceed the range of i32")]
    ChannelingRangeOverflow { offset: i32, num_literals: usize },
    #[error("{0} must have an enumerated domain")]
    EnumeratedDomainRequired(VariableId),
    #[error("the name '{0}' is already used by another variable")]
    DuplicateName(String),
}
