//! Extensional constraints, given as a list of allowed or forbidden tuples.
mod forward_checking;
mod large_tuple_table;
mod tuples;

pub(crate) use forward_checking::*;
pub(crate) use large_tuple_table::*;
pub use tuples::*;
