use enumset::EnumSet;

use super::DomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::VariableId;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorVarId;

/// Whether a propagator is notified of the changes it makes itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelfNotification {
    /// Changes made by the subscribing propagator neither enqueue it nor show up in its deltas.
    #[default]
    Suppress,
    /// The subscribing propagator is treated like any other subscriber.
    Allow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Watcher {
    pub(crate) propagator_var: PropagatorVarId,
    pub(crate) events: EnumSet<DomainEvent>,
    pub(crate) self_notification: SelfNotification,
}

impl Watcher {
    /// The events of `events` this watcher should hear about, given that they were caused by
    /// `cause`.
    pub(crate) fn relevant_events(
        &self,
        events: EnumSet<DomainEvent>,
        cause: Option<PropagatorId>,
    ) -> EnumSet<DomainEvent> {
        if self.self_notification == SelfNotification::Suppress
            && cause == Some(self.propagator_var.propagator)
        {
            return EnumSet::empty();
        }

        self.events & events
    }
}

/// For every variable, the propagator slots which are subscribed to its events.
#[derive(Default, Debug, Clone)]
pub(crate) struct WatchList {
    watchers: KeyedVec<VariableId, Vec<Watcher>>,
}

impl WatchList {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(Vec::new());
    }

    pub(crate) fn watch(&mut self, variable: VariableId, watcher: Watcher) {
        self.watchers[variable].push(watcher);
    }

    pub(crate) fn unwatch(&mut self, variable: VariableId, propagator: PropagatorId) {
        self.watchers[variable].retain(|watcher| watcher.propagator_var.propagator != propagator);
    }

    pub(crate) fn get(&self, variable: VariableId) -> &[Watcher] {
        &self.watchers[variable]
    }
}
