use super::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::ReadDomains;
use super::SelfNotification;
use crate::engine::variables::Variable;
use crate::engine::variables::VariableId;
use crate::engine::State;
use crate::engine::TrailedInteger;

/// Creates a fully initialised [`Propagator`].
///
/// The constructor registers the variables of the propagator, and may initialise the propagator
/// from the current domains.
pub trait PropagatorConstructor {
    type PropagatorImpl: Propagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// A variable registered by a propagator under construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Registration {
    pub(crate) variable: VariableId,
    pub(crate) local_id: LocalId,
    pub(crate) self_notification: SelfNotification,
}

/// Handed to [`PropagatorConstructor::create`], to register variables and to set up state.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    state: &'a mut State,
    registrations: &'a mut Vec<Registration>,
    propagator_id: PropagatorId,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        state: &'a mut State,
        registrations: &'a mut Vec<Registration>,
    ) -> Self {
        PropagatorConstructorContext {
            state,
            registrations,
            propagator_id,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Subscribe the propagator to `variable` under `local_id`.
    ///
    /// Each registered variable must have a distinct local id; usually its index in the scope of
    /// the propagator. The events the slot listens to are taken from
    /// [`Propagator::propagation_conditions`] once the propagator is created. The propagator is
    /// not notified of its own changes to the variable.
    pub fn register(&mut self, variable: impl Variable, local_id: LocalId) {
        self.register_with(variable, local_id, SelfNotification::Suppress);
    }

    /// Like [`PropagatorConstructorContext::register`], with explicit control over
    /// notifications about the propagator's own changes.
    pub fn register_with(
        &mut self,
        variable: impl Variable,
        local_id: LocalId,
        self_notification: SelfNotification,
    ) {
        crate::gourd_assert_moderate!(
            self.registrations
                .iter()
                .all(|registration| registration.local_id != local_id),
            "local id {local_id} is registered twice"
        );

        self.registrations.push(Registration {
            variable: variable.variable_id(),
            local_id,
            self_notification,
        });
    }

    /// A new backtrackable integer cell, for incremental propagator state.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.state.new_trailed_integer(initial_value)
    }
}

impl ReadDomains for PropagatorConstructorContext<'_> {
    fn domains(&self) -> Domains<'_> {
        self.state.domains()
    }
}
