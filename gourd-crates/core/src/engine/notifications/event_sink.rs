use enumset::EnumSet;

use super::DomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::VariableId;

/// Collects the events triggered while a propagator runs (or while decisions are posted from
/// outside the engine). Once the batch is complete, the sink is drained to notify the
/// subscribers of the touched variables.
///
/// Events are merged per variable, so a variable is reported at most once per batch.
#[derive(Default, Debug, Clone)]
pub(crate) struct EventSink {
    present: KeyedVec<VariableId, EnumSet<DomainEvent>>,
    touched: Vec<VariableId>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
    }

    pub(crate) fn event_occurred(&mut self, variable: VariableId, events: EnumSet<DomainEvent>) {
        if events.is_empty() {
            return;
        }

        let present = &mut self.present[variable];
        if present.is_empty() {
            self.touched.push(variable);
        }
        present.insert_all(events);
    }

    pub(crate) fn drain(
        &mut self,
    ) -> impl Iterator<Item = (VariableId, EnumSet<DomainEvent>)> + '_ {
        self.touched
            .drain(..)
            .map(|variable| (variable, std::mem::take(&mut self.present[variable])))
    }

    pub(crate) fn clear(&mut self) {
        let _ = self.drain().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    fn sink_with_variables(num_variables: usize) -> EventSink {
        let mut sink = EventSink::default();
        for _ in 0..num_variables {
            sink.grow();
        }
        sink
    }

    #[test]
    fn the_default_sink_is_empty() {
        let mut sink = EventSink::default();

        assert_eq!(0, sink.drain().count());
    }

    #[test]
    fn events_on_the_same_variable_are_merged() {
        let mut sink = sink_with_variables(1);
        let variable = VariableId::create_from_index(0);

        sink.event_occurred(variable, DomainEvent::LowerBound.into());
        sink.event_occurred(variable, DomainEvent::Removal | DomainEvent::LowerBound);

        let events = sink.drain().collect::<Vec<_>>();
        assert_eq!(
            vec![(variable, DomainEvent::LowerBound | DomainEvent::Removal)],
            events
        );
    }

    #[test]
    fn variables_are_reported_in_order_of_first_event() {
        let mut sink = sink_with_variables(3);
        let first = VariableId::create_from_index(2);
        let second = VariableId::create_from_index(0);

        sink.event_occurred(first, DomainEvent::SetEnforce.into());
        sink.event_occurred(second, DomainEvent::ArcRemove.into());
        sink.event_occurred(first, DomainEvent::SetRemove.into());

        let variables = sink.drain().map(|(variable, _)| variable).collect::<Vec<_>>();
        assert_eq!(vec![first, second], variables);
    }

    #[test]
    fn after_draining_the_event_sink_is_empty() {
        let mut sink = sink_with_variables(2);

        sink.event_occurred(VariableId::create_from_index(1), DomainEvent::Assign.into());
        let _ = sink.drain().count();

        assert_eq!(0, sink.drain().count());
    }
}
