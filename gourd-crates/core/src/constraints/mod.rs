//! Defines the constraints which can be posted on a [`State`].
//!
//! A constraint is a relation over variables. In the engine, constraints are enforced through
//! propagators, and therefore constraints can be viewed as a collection of propagators. The
//! functions in this module check that the constraint is well-formed for the variables it is
//! posted on before any propagator is added.
//!
//! # Example
//! ```
//! # use gourd_core::constraints;
//! # use gourd_core::constraints::Constraint;
//! # use gourd_core::engine::State;
//! let mut state = State::default();
//!
//! let x = state.new_integer_variable(0, 2, None).unwrap();
//! let y = state.new_integer_variable(0, 2, None).unwrap();
//! let tuples = constraints::Tuples::allowed([[0, 1], [1, 2]]);
//!
//! constraints::table([x, y], tuples).post(&mut state).unwrap();
//! ```

mod channeling;
mod set_sum;
mod table;

pub use channeling::*;
pub use set_sum::*;
pub use table::*;

use crate::basic_types::ModelError;
use crate::engine::State;
use crate::propagation::PropagatorConstructor;

/// A [`Constraint`] is a relation over variables. It disqualifies certain partial assignments of
/// making it into a solution of the problem.
pub trait Constraint {
    /// Add the propagators of the [`Constraint`] to the [`State`].
    ///
    /// This method returns a [`ModelError`] if the constraint does not fit the variables it is
    /// posted on, in which case nothing is added. Propagation only happens on the next call to
    /// [`State::propagate_to_fixed_point`].
    fn post(self, state: &mut State) -> Result<(), ModelError>;
}

impl<ConcretePropagator> Constraint for ConcretePropagator
where
    ConcretePropagator: PropagatorConstructor + 'static,
{
    fn post(self, state: &mut State) -> Result<(), ModelError> {
        let _ = state.add_propagator(self);
        Ok(())
    }
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(self, state: &mut State) -> Result<(), ModelError> {
        self.into_iter().try_for_each(|c| c.post(state))
    }
}
