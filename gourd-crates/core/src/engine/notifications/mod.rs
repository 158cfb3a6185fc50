//! Routing of domain changes to the propagators which subscribed to them.
//!
//! Every domain mutation produces a set of [`DomainEvent`]s, which are collected in an event sink
//! and dispatched to the subscribed propagator slots once the mutating propagator returns.
//! Element-level changes are additionally recorded in a delta log, from which fine-grained
//! propagators read exactly what changed since their previous activation.

mod delta_log;
mod domain_events;
mod event_sink;
mod watch_list;

pub(crate) use delta_log::*;
pub use domain_events::*;
use enumset::EnumSet;
pub(crate) use event_sink::*;
pub use watch_list::SelfNotification;
pub(crate) use watch_list::*;

use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::engine::variables::VariableId;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorVarId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Subscription {
    pub(crate) variable: VariableId,
    pub(crate) self_notification: SelfNotification,
}

/// The records a subscription slot has not consumed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ClaimedDelta {
    pub(crate) variable: VariableId,
    pub(crate) range: std::ops::Range<usize>,
    /// Records with this cause must not be shown to the reader.
    pub(crate) hidden_cause: Option<PropagatorId>,
}

#[derive(Default, Debug, Clone)]
pub(crate) struct NotificationEngine {
    watch_list: WatchList,
    event_sink: EventSink,
    delta_log: DeltaLog,
    subscriptions: HashMap<PropagatorVarId, Subscription>,
    /// The local ids registered by every propagator.
    slots: KeyedVec<PropagatorId, Vec<LocalId>>,
    /// Events which reached a propagator slot but were not yet handled by the propagator, at
    /// most one entry per slot.
    pending: KeyedVec<PropagatorId, Vec<(LocalId, EnumSet<DomainEvent>)>>,
}

impl NotificationEngine {
    pub(crate) fn grow(&mut self) {
        self.watch_list.grow();
        self.event_sink.grow();
        self.delta_log.grow();
    }

    pub(crate) fn subscribe(
        &mut self,
        propagator_var: PropagatorVarId,
        variable: VariableId,
        events: EnumSet<DomainEvent>,
        self_notification: SelfNotification,
    ) {
        let propagator = propagator_var.propagator;
        self.slots.accomodate(propagator, Vec::new());
        self.pending.accomodate(propagator, Vec::new());

        self.slots[propagator].push(propagator_var.variable);
        let _ = self.subscriptions.insert(
            propagator_var,
            Subscription {
                variable,
                self_notification,
            },
        );
        self.watch_list.watch(
            variable,
            Watcher {
                propagator_var,
                events,
                self_notification,
            },
        );
    }

    pub(crate) fn unsubscribe_all(&mut self, propagator: PropagatorId) {
        let Some(slots) = self.slots.get(propagator) else {
            return;
        };

        for local_id in slots {
            let propagator_var = PropagatorVarId {
                propagator,
                variable: *local_id,
            };
            if let Some(subscription) = self.subscriptions.remove(&propagator_var) {
                self.watch_list.unwatch(subscription.variable, propagator);
            }
        }

        self.slots[propagator].clear();
        self.pending[propagator].clear();
    }

    pub(crate) fn subscription(&self, propagator_var: PropagatorVarId) -> Option<Subscription> {
        self.subscriptions.get(&propagator_var).copied()
    }

    pub(crate) fn event_occurred(&mut self, variable: VariableId, events: EnumSet<DomainEvent>) {
        self.event_sink.event_occurred(variable, events);
    }

    pub(crate) fn record_delta(
        &mut self,
        variable: VariableId,
        kind: DeltaKind,
        (lower, upper): (i32, i32),
        cause: Option<PropagatorId>,
    ) {
        self.delta_log.record(
            variable,
            kind,
            DeltaEntry {
                lower,
                upper,
                cause,
            },
        );
    }

    /// Dispatch the collected batch of events, all of which were caused by `cause`.
    ///
    /// `on_notified` is called for every propagator which received at least one event.
    pub(crate) fn notify_subscribers(
        &mut self,
        cause: Option<PropagatorId>,
        mut on_notified: impl FnMut(PropagatorId),
    ) {
        let NotificationEngine {
            watch_list,
            event_sink,
            pending,
            ..
        } = self;

        for (variable, events) in event_sink.drain() {
            for watcher in watch_list.get(variable) {
                let relevant = watcher.relevant_events(events, cause);
                if relevant.is_empty() {
                    continue;
                }

                let PropagatorVarId {
                    propagator,
                    variable: local_id,
                } = watcher.propagator_var;
                let slots = &mut pending[propagator];
                match slots.iter_mut().find(|(slot, _)| *slot == local_id) {
                    Some((_, events)) => events.insert_all(relevant),
                    None => slots.push((local_id, relevant)),
                }
                on_notified(propagator);
            }
        }
    }

    /// Take the events which were dispatched to `propagator` since it last ran.
    pub(crate) fn take_pending(
        &mut self,
        propagator: PropagatorId,
    ) -> Vec<(LocalId, EnumSet<DomainEvent>)> {
        self.pending.accomodate(propagator, Vec::new());
        std::mem::take(&mut self.pending[propagator])
    }

    /// Mark every delta record as seen by all slots of `propagator`.
    pub(crate) fn fast_forward(&mut self, propagator: PropagatorId) {
        let Some(slots) = self.slots.get(propagator) else {
            return;
        };

        for local_id in slots {
            let reader = PropagatorVarId {
                propagator,
                variable: *local_id,
            };
            if let Some(subscription) = self.subscriptions.get(&reader) {
                self.delta_log.fast_forward(reader, subscription.variable);
            }
        }
    }

    pub(crate) fn claim_delta(
        &mut self,
        reader: PropagatorVarId,
        kind: DeltaKind,
    ) -> Option<ClaimedDelta> {
        let subscription = self.subscription(reader)?;
        let range = self.delta_log.claim(reader, subscription.variable, kind);

        Some(ClaimedDelta {
            variable: subscription.variable,
            range,
            hidden_cause: match subscription.self_notification {
                SelfNotification::Suppress => Some(reader.propagator),
                SelfNotification::Allow => None,
            },
        })
    }

    pub(crate) fn delta_entry(
        &self,
        variable: VariableId,
        kind: DeltaKind,
        index: usize,
    ) -> DeltaEntry {
        self.delta_log.entry(variable, kind, index)
    }

    pub(crate) fn clear_deltas(&mut self) {
        self.delta_log.clear();
    }

    /// Drop all undispatched events, unhandled notifications and delta records.
    pub(crate) fn reset(&mut self) {
        self.event_sink.clear();
        self.pending.iter_mut().for_each(Vec::clear);
        self.delta_log.clear();
    }
}
