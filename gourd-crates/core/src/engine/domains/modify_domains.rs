use enumset::EnumSet;

use super::Assignments;
use super::EnvelopeKernelDomain;
use super::IntegerUpdate;
use crate::basic_types::EmptyDomainConflict;
use crate::engine::notifications::DeltaKind;
use crate::engine::notifications::NotificationEngine;
use crate::engine::variables::DomainId;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::SetVariable;
use crate::engine::variables::Variable;
use crate::engine::variables::VariableId;
use crate::engine::TrailedValues;
use crate::propagation::PropagatorId;

/// Applies domain mutations on behalf of `cause`, reporting the resulting events and delta
/// records to the notification engine.
#[derive(Debug)]
pub struct DomainWriter<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) store: &'a mut TrailedValues,
    pub(crate) notifications: &'a mut NotificationEngine,
    /// `None` for mutations from outside the engine.
    pub(crate) cause: Option<PropagatorId>,
}

impl DomainWriter<'_> {
    fn conflict(&self, variable: impl Variable, reason: &'static str) -> EmptyDomainConflict {
        EmptyDomainConflict {
            variable: variable.variable_id(),
            propagator: self.cause,
            reason,
        }
    }

    fn integer_changed(&mut self, variable: DomainId, update: Option<IntegerUpdate>) -> bool {
        let Some(update) = update else {
            return false;
        };

        self.notifications
            .event_occurred(variable.variable_id(), update.events);
        self.notifications.record_delta(
            variable.variable_id(),
            DeltaKind::ValueRemoved,
            update.removed,
            self.cause,
        );
        true
    }

    fn set_lower_bound(
        &mut self,
        variable: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        let update = self
            .assignments
            .integer(variable)
            .set_lower_bound(self.store, value)
            .map_err(|_| self.conflict(variable, "lower bound exceeds the upper bound"))?;
        Ok(self.integer_changed(variable, update))
    }

    fn set_upper_bound(
        &mut self,
        variable: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        let update = self
            .assignments
            .integer(variable)
            .set_upper_bound(self.store, value)
            .map_err(|_| self.conflict(variable, "upper bound is below the lower bound"))?;
        Ok(self.integer_changed(variable, update))
    }

    fn remove_value(
        &mut self,
        variable: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        let update = self
            .assignments
            .integer(variable)
            .remove_value(self.store, value)
            .map_err(|_| self.conflict(variable, "removed the last value"))?;
        Ok(self.integer_changed(variable, update))
    }

    fn assign(&mut self, variable: DomainId, value: i32) -> Result<bool, EmptyDomainConflict> {
        if !self.assignments.integer(variable).contains(self.store, value) {
            return Err(self.conflict(variable, "assigned value is not in the domain"));
        }

        let lower_bound_changed = self.set_lower_bound(variable, value)?;
        let upper_bound_changed = self.set_upper_bound(variable, value)?;
        Ok(lower_bound_changed || upper_bound_changed)
    }

    fn update_envelope_kernel<D: EnvelopeKernelDomain>(
        &mut self,
        variable: VariableId,
        domain: &D,
        element: D::Element,
        enforce: bool,
    ) -> Result<bool, EmptyDomainConflict> {
        let (result, event, reason) = if enforce {
            (
                domain.enforce(self.store, element),
                D::ENFORCE_EVENT,
                "enforced element is not in the envelope",
            )
        } else {
            (
                domain.exclude(self.store, element),
                D::EXCLUDE_EVENT,
                "removed element is in the kernel",
            )
        };

        let changed = result.map_err(|_| self.conflict(variable, reason))?;
        if changed {
            self.notifications
                .event_occurred(variable, EnumSet::only(event));
            if let Some(kind) = event.delta_kind() {
                let encoded = domain.encode(element);
                self.notifications
                    .record_delta(variable, kind, (encoded, encoded), self.cause);
            }
        }
        Ok(changed)
    }
}

/// Mutations of the current domains.
///
/// Every mutation returns whether the domain changed, or an [`EmptyDomainConflict`] if it would
/// leave the domain empty, in which case nothing is changed.
pub trait ModifyDomains {
    #[doc(hidden)]
    fn domain_writer(&mut self) -> DomainWriter<'_>;

    fn set_lower_bound(
        &mut self,
        variable: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        self.domain_writer().set_lower_bound(variable, value)
    }

    fn set_upper_bound(
        &mut self,
        variable: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        self.domain_writer().set_upper_bound(variable, value)
    }

    /// Remove `value` from the domain of `variable`.
    ///
    /// For a variable with [`IntegerRepresentation::Bounds`](super::IntegerRepresentation) only
    /// the bounds can be removed; other values are silently kept.
    fn remove_value(
        &mut self,
        variable: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        self.domain_writer().remove_value(variable, value)
    }

    fn assign(&mut self, variable: DomainId, value: i32) -> Result<bool, EmptyDomainConflict> {
        self.domain_writer().assign(variable, value)
    }

    fn set_literal(
        &mut self,
        literal: Literal,
        truth_value: bool,
    ) -> Result<bool, EmptyDomainConflict> {
        self.domain_writer()
            .assign(literal.domain_id(), i32::from(truth_value))
    }

    fn set_true(&mut self, literal: Literal) -> Result<bool, EmptyDomainConflict> {
        self.set_literal(literal, true)
    }

    fn set_false(&mut self, literal: Literal) -> Result<bool, EmptyDomainConflict> {
        self.set_literal(literal, false)
    }

    /// Add `value` to the kernel of `set`.
    fn enforce_element(
        &mut self,
        set: SetVariable,
        value: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        let mut writer = self.domain_writer();
        let assignments = writer.assignments;
        let domain = assignments.set(set);
        writer.update_envelope_kernel(set.variable_id(), domain, value, true)
    }

    /// Remove `value` from the envelope of `set`.
    fn remove_element(
        &mut self,
        set: SetVariable,
        value: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        let mut writer = self.domain_writer();
        let assignments = writer.assignments;
        let domain = assignments.set(set);
        writer.update_envelope_kernel(set.variable_id(), domain, value, false)
    }

    /// Fix `set` to exactly `values`: they all join the kernel and everything else leaves the
    /// envelope.
    ///
    /// Fails without changing the domain if a value is not in the envelope, or if a kernel value
    /// is not among `values`.
    fn instantiate_set(
        &mut self,
        set: SetVariable,
        values: &[i32],
    ) -> Result<bool, EmptyDomainConflict> {
        let mut writer = self.domain_writer();
        let assignments = writer.assignments;
        let domain = assignments.set(set);

        if values
            .iter()
            .any(|&value| !domain.envelope_contains(writer.store, value))
        {
            return Err(writer.conflict(set, "instantiated value is not in the envelope"));
        }
        if domain
            .kernel_values(writer.store)
            .any(|value| !values.contains(&value))
        {
            return Err(writer.conflict(set, "kernel value is not part of the instantiation"));
        }

        let mut changed = false;
        for &value in values {
            changed |= writer.update_envelope_kernel(set.variable_id(), domain, value, true)?;
        }
        let excluded = domain
            .envelope_values(writer.store)
            .filter(|value| !values.contains(value))
            .collect::<Vec<_>>();
        for value in excluded {
            changed |= writer.update_envelope_kernel(set.variable_id(), domain, value, false)?;
        }
        Ok(changed)
    }

    /// Add the arc `(from, to)` to the kernel of `graph`.
    fn enforce_arc(
        &mut self,
        graph: GraphVariable,
        from: usize,
        to: usize,
    ) -> Result<bool, EmptyDomainConflict> {
        let mut writer = self.domain_writer();
        let assignments = writer.assignments;
        let domain = assignments.graph(graph);
        writer.update_envelope_kernel(graph.variable_id(), domain, (from, to), true)
    }

    /// Remove the arc `(from, to)` from the envelope of `graph`.
    fn remove_arc(
        &mut self,
        graph: GraphVariable,
        from: usize,
        to: usize,
    ) -> Result<bool, EmptyDomainConflict> {
        let mut writer = self.domain_writer();
        let assignments = writer.assignments;
        let domain = assignments.graph(graph);
        writer.update_envelope_kernel(graph.variable_id(), domain, (from, to), false)
    }
}
