use std::borrow::Cow;

use super::Domains;
use super::DeltaKind;
use super::LocalId;
use super::ModifyDomains;
use super::PropagatorId;
use super::PropagatorVarId;
use super::ReadDomains;
use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::engine::domains::Assignments;
use crate::engine::domains::DomainWriter;
use crate::engine::notifications::NotificationEngine;
use crate::engine::variables::GraphVariable;
use crate::engine::AbortSignal;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;

/// The interface through which a propagator reads and changes the domains while it runs.
///
/// Every change made through the context is attributed to the running propagator.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) store: &'a mut TrailedValues,
    pub(crate) notifications: &'a mut NotificationEngine,
    pub(crate) propagator_id: PropagatorId,
    pub(crate) abort_signal: &'a AbortSignal,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        assignments: &'a Assignments,
        store: &'a mut TrailedValues,
        notifications: &'a mut NotificationEngine,
        propagator_id: PropagatorId,
        abort_signal: &'a AbortSignal,
    ) -> Self {
        PropagationContext {
            assignments,
            store,
            notifications,
            propagator_id,
            abort_signal,
        }
    }

    /// A context with a shorter lifetime, for passing to a function which takes ownership.
    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            assignments: self.assignments,
            store: self.store,
            notifications: self.notifications,
            propagator_id: self.propagator_id,
            abort_signal: self.abort_signal,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// A contradiction raised by the running propagator.
    pub fn conflict(&self, reason: impl Into<Cow<'static, str>>) -> Contradiction {
        PropagatorConflict {
            propagator: self.propagator_id,
            reason: reason.into(),
        }
        .into()
    }

    /// Whether the fixpoint computation was asked to stop. Long-running filtering loops may poll
    /// this and return early; the engine reports the fixpoint as aborted.
    pub fn is_aborted(&self) -> bool {
        self.abort_signal.is_aborted()
    }

    pub fn value(&self, trailed_integer: TrailedInteger) -> i64 {
        self.store.read(trailed_integer)
    }

    pub fn assign_trailed(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.store.assign(trailed_integer, value);
    }

    pub fn add_assign_trailed(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.store.add_assign(trailed_integer, addition);
    }

    /// Visit the records of `kind` on the variable registered with `local_id` which this
    /// propagator has not seen yet, as `(lower, upper)` pairs.
    ///
    /// The visited range is fixed when the call starts: records created by the visitor itself are
    /// left for the next activation. Unless the slot was registered with
    /// [`SelfNotification::Allow`](super::SelfNotification::Allow), records caused by this
    /// propagator are skipped.
    pub fn for_each_delta(
        &mut self,
        local_id: LocalId,
        kind: DeltaKind,
        mut visitor: impl FnMut(&mut Self, i32, i32) -> PropagationStatus,
    ) -> PropagationStatus {
        let reader = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };
        let Some(claimed) = self.notifications.claim_delta(reader, kind) else {
            log::warn!(
                "{} read deltas of unregistered local id {local_id}",
                self.propagator_id
            );
            return Ok(());
        };

        for index in claimed.range {
            let entry = self.notifications.delta_entry(claimed.variable, kind, index);
            if claimed.hidden_cause.is_some() && entry.cause == claimed.hidden_cause {
                continue;
            }
            visitor(self, entry.lower, entry.upper)?;
        }

        Ok(())
    }

    /// Visit the ranges of values removed from the integer variable registered with `local_id`.
    ///
    /// A range may include values which were already absent before the removal.
    pub fn for_each_removed_range(
        &mut self,
        local_id: LocalId,
        visitor: impl FnMut(&mut Self, i32, i32) -> PropagationStatus,
    ) -> PropagationStatus {
        self.for_each_delta(local_id, DeltaKind::ValueRemoved, visitor)
    }

    /// Visit the values added to the kernel of the set variable registered with `local_id`.
    pub fn for_each_enforced_element(
        &mut self,
        local_id: LocalId,
        mut visitor: impl FnMut(&mut Self, i32) -> PropagationStatus,
    ) -> PropagationStatus {
        self.for_each_delta(local_id, DeltaKind::SetEnforce, |context, value, _| {
            visitor(context, value)
        })
    }

    /// Visit the values removed from the envelope of the set variable registered with
    /// `local_id`.
    pub fn for_each_removed_element(
        &mut self,
        local_id: LocalId,
        mut visitor: impl FnMut(&mut Self, i32) -> PropagationStatus,
    ) -> PropagationStatus {
        self.for_each_delta(local_id, DeltaKind::SetRemove, |context, value, _| {
            visitor(context, value)
        })
    }

    /// Visit the arcs added to the kernel of `graph`, registered with `local_id`.
    pub fn for_each_enforced_arc(
        &mut self,
        graph: GraphVariable,
        local_id: LocalId,
        visitor: impl FnMut(&mut Self, usize, usize) -> PropagationStatus,
    ) -> PropagationStatus {
        self.for_each_arc(graph, local_id, DeltaKind::ArcEnforce, visitor)
    }

    /// Visit the arcs removed from the envelope of `graph`, registered with `local_id`.
    pub fn for_each_removed_arc(
        &mut self,
        graph: GraphVariable,
        local_id: LocalId,
        visitor: impl FnMut(&mut Self, usize, usize) -> PropagationStatus,
    ) -> PropagationStatus {
        self.for_each_arc(graph, local_id, DeltaKind::ArcRemove, visitor)
    }

    fn for_each_arc(
        &mut self,
        graph: GraphVariable,
        local_id: LocalId,
        kind: DeltaKind,
        mut visitor: impl FnMut(&mut Self, usize, usize) -> PropagationStatus,
    ) -> PropagationStatus {
        let assignments: &'a Assignments = self.assignments;
        let domain = assignments.graph(graph);
        self.for_each_delta(local_id, kind, |context, element, _| {
            let (from, to) = domain.decode(element);
            visitor(context, from, to)
        })
    }
}

impl ReadDomains for PropagationContext<'_> {
    fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.store)
    }
}

impl ModifyDomains for PropagationContext<'_> {
    fn domain_writer(&mut self) -> DomainWriter<'_> {
        DomainWriter {
            assignments: self.assignments,
            store: self.store,
            notifications: self.notifications,
            cause: Some(self.propagator_id),
        }
    }
}
