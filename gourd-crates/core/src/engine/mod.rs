//! The propagation engine: the backtrackable store, the domains of all variables, the routing of
//! domain events to propagators and the queue which runs them to a fixpoint.
//!
//! [`State`] is the entry point; everything else in this module is used through it.

mod abort_signal;
pub(crate) mod domains;
pub(crate) mod notifications;
mod propagator_queue;
mod state;
pub(crate) mod test_solver;
pub(crate) mod trailed;
mod variable_names;
pub mod variables;

pub use abort_signal::AbortSignal;
pub use domains::Assignments;
pub use domains::GraphOrientation;
pub use domains::GraphView;
pub use domains::IntegerRepresentation;
pub(crate) use propagator_queue::PropagatorQueue;
pub use state::*;
pub use trailed::TrailedInteger;
pub use trailed::TrailedValues;
pub use variable_names::VariableNames;
