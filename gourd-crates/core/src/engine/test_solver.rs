#![cfg(test)]
//! Helpers for testing propagators. The [`TestSolver`] sets up the scenario under which a
//! propagator is tested: create variables, post the propagator, make decisions and propagate.
use std::ops::Deref;
use std::ops::DerefMut;

use super::Fixpoint;
use super::GraphOrientation;
use super::State;
use crate::basic_types::Contradiction;
use crate::engine::variables::DomainId;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::SetVariable;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;
use crate::propagation::ReadDomains;

/// A [`State`] with shorthands for building test scenarios.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    state: State,
}

impl Deref for TestSolver {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl DerefMut for TestSolver {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.state
            .new_integer_variable(lower_bound, upper_bound, None)
            .expect("valid bounds")
    }

    pub(crate) fn new_literal(&mut self) -> Literal {
        self.state.new_literal(None).expect("unnamed")
    }

    pub(crate) fn new_set(&mut self, envelope: &[i32], kernel: &[i32]) -> SetVariable {
        self.state
            .new_set_variable(envelope, kernel, None)
            .expect("kernel within envelope")
    }

    pub(crate) fn new_graph(
        &mut self,
        num_vertices: usize,
        orientation: GraphOrientation,
        envelope: &[(usize, usize)],
        kernel: &[(usize, usize)],
    ) -> GraphVariable {
        self.state
            .new_graph_variable(num_vertices, orientation, envelope, kernel, None)
            .expect("arcs within the graph")
    }

    /// Post the propagator and propagate to a fixpoint.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Contradiction>
    where
        Constructor: PropagatorConstructor,
    {
        let handle = self.state.add_propagator(constructor);
        self.propagate()?;
        Ok(handle)
    }

    pub(crate) fn propagate(&mut self) -> Result<(), Contradiction> {
        let fixpoint = self.state.propagate_to_fixed_point()?;
        assert_eq!(Fixpoint::Reached, fixpoint);
        Ok(())
    }

    pub(crate) fn assert_bounds(&self, variable: DomainId, lower_bound: i32, upper_bound: i32) {
        assert_eq!(
            (lower_bound, upper_bound),
            (self.lower_bound(variable), self.upper_bound(variable)),
            "unexpected bounds for {variable}"
        );
    }

    pub(crate) fn assert_kernel(&self, set: SetVariable, expected: &[i32]) {
        assert_eq!(expected, self.kernel_values(set).collect::<Vec<_>>());
    }

    pub(crate) fn assert_envelope(&self, set: SetVariable, expected: &[i32]) {
        assert_eq!(expected, self.envelope_values(set).collect::<Vec<_>>());
    }
}
