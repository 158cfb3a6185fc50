use log::debug;
use log::trace;

use crate::basic_types::Contradiction;
use crate::basic_types::Entailment;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::containers::KeyedVec;
use crate::create_statistics_struct;
use crate::engine::domains::Assignments;
use crate::engine::domains::DomainWriter;
use crate::engine::domains::Domains;
use crate::engine::domains::GraphOrientation;
use crate::engine::domains::IntegerRepresentation;
use crate::engine::domains::ModifyDomains;
use crate::engine::domains::ReadDomains;
use crate::engine::notifications::NotificationEngine;
use crate::engine::variables::DomainId;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::SetVariable;
use crate::engine::variables::Variable;
use crate::engine::variables::VariableId;
use crate::engine::AbortSignal;
use crate::engine::PropagatorQueue;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;
use crate::engine::VariableNames;
use crate::gourd_assert_eq_simple;
use crate::gourd_assert_simple;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorStatus;
use crate::propagation::PropagatorStore;
use crate::propagation::PropagatorVarId;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// How a call to [`State::propagate_to_fixed_point`] ended without a contradiction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fixpoint {
    /// No propagator can narrow any domain further.
    Reached,
    /// The [`AbortSignal`] was raised. Every mutation made so far is fully applied, and the
    /// propagators which did not get to run are still enqueued; propagating again continues
    /// where the aborted run stopped.
    Aborted,
}

create_statistics_struct!(
    /// Counters kept by the [`State`].
    EngineStatistics {
        num_coarse_propagations: usize,
        num_fine_propagations: usize,
        num_contradictions: usize,
        num_checkpoints: usize,
        num_restores: usize,
        num_undone_writes: usize,
        num_aborts: usize,
    }
);

/// The state of a constraint model: its variables, its propagators and the backtrackable store
/// in which all domains live.
///
/// An external search drives the state through a cycle of decisions (made through
/// [`ModifyDomains`]), [`State::propagate_to_fixed_point`], [`State::new_checkpoint`] and
/// [`State::restore_to`]:
///
/// ```
/// use gourd_core::engine::State;
/// use gourd_core::propagation::ModifyDomains;
/// use gourd_core::propagation::ReadDomains;
///
/// let mut state = State::default();
/// let x = state.new_integer_variable(0, 10, Some("x")).unwrap();
///
/// let checkpoint = state.new_checkpoint();
/// let _ = state.set_lower_bound(x, 4).unwrap();
/// let _ = state.propagate_to_fixed_point().unwrap();
/// assert_eq!(4, state.lower_bound(x));
///
/// state.restore_to(checkpoint);
/// assert_eq!(0, state.lower_bound(x));
/// ```
#[derive(Debug, Default)]
pub struct State {
    assignments: Assignments,
    trailed_values: TrailedValues,
    variable_names: VariableNames,
    propagators: PropagatorStore,
    propagator_queue: PropagatorQueue,
    notification_engine: NotificationEngine,
    /// Whether the next activation of a propagator has to be a full propagation.
    requires_full_propagation: KeyedVec<PropagatorId, bool>,
    running: Option<PropagatorId>,
    failed: Option<PropagatorId>,
    abort_signal: AbortSignal,
    statistics: EngineStatistics,
}

/// Operations to create variables.
impl State {
    /// Create an enumerated integer variable with domain `[lower_bound, upper_bound]`.
    pub fn new_integer_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<&str>,
    ) -> Result<DomainId, ModelError> {
        self.new_integer_variable_with(
            lower_bound,
            upper_bound,
            IntegerRepresentation::Enumerated,
            name,
        )
    }

    /// Create an integer variable with domain `[lower_bound, upper_bound]` using the given
    /// representation.
    pub fn new_integer_variable_with(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        representation: IntegerRepresentation,
        name: Option<&str>,
    ) -> Result<DomainId, ModelError> {
        self.check_name(name)?;
        let domain_id = self.assignments.new_integer_variable(
            &mut self.trailed_values,
            lower_bound,
            upper_bound,
            representation,
        )?;
        self.variable_created(domain_id, name)?;

        Ok(domain_id)
    }

    /// Create a Boolean variable, a 0-1 integer variable where 1 means true.
    pub fn new_literal(&mut self, name: Option<&str>) -> Result<Literal, ModelError> {
        let domain_id = self.new_integer_variable(0, 1, name)?;
        Ok(Literal::new(domain_id))
    }

    /// Create a set variable over the values of `envelope`, of which the values in `kernel` are
    /// certainly part of the set.
    pub fn new_set_variable(
        &mut self,
        envelope: &[i32],
        kernel: &[i32],
        name: Option<&str>,
    ) -> Result<SetVariable, ModelError> {
        self.check_name(name)?;
        let set = self
            .assignments
            .new_set_variable(&mut self.trailed_values, envelope, kernel)?;
        self.variable_created(set, name)?;

        Ok(set)
    }

    /// Create a graph variable on `num_vertices` vertices, with the arcs of `envelope` possibly
    /// and the arcs of `kernel` certainly part of the graph.
    ///
    /// For an undirected graph, an arc `(i, j)` stands for both `(i, j)` and `(j, i)`.
    pub fn new_graph_variable(
        &mut self,
        num_vertices: usize,
        orientation: GraphOrientation,
        envelope: &[(usize, usize)],
        kernel: &[(usize, usize)],
        name: Option<&str>,
    ) -> Result<GraphVariable, ModelError> {
        self.check_name(name)?;
        let graph = self.assignments.new_graph_variable(
            &mut self.trailed_values,
            num_vertices,
            orientation,
            envelope,
            kernel,
        )?;
        self.variable_created(graph, name)?;

        Ok(graph)
    }

    /// A new backtrackable cell holding `initial_value`.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values.grow(initial_value)
    }

    pub fn variable_name(&self, variable: impl Variable) -> Option<&str> {
        self.variable_names.get_name(variable.variable_id())
    }

    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_names.get_by_name(name)
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_variables()
    }

    fn check_name(&self, name: Option<&str>) -> Result<(), ModelError> {
        match name {
            Some(name) if self.variable_names.contains(name) => {
                Err(ModelError::DuplicateName(name.to_owned()))
            }
            _ => Ok(()),
        }
    }

    fn variable_created(
        &mut self,
        variable: impl Variable,
        name: Option<&str>,
    ) -> Result<(), ModelError> {
        self.notification_engine.grow();
        if let Some(name) = name {
            self.variable_names.add(variable.variable_id(), name)?;
        }

        Ok(())
    }
}

/// Operations on propagators.
impl State {
    /// Add a propagator to the state, returning a handle through which it can be retrieved.
    ///
    /// The propagator is enqueued, and runs its full [`Propagator::propagate`] during the next
    /// call to [`State::propagate_to_fixed_point`].
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let expected_handle = self.propagators.next_handle::<Constructor::PropagatorImpl>();
        let propagator_id = expected_handle.propagator_id();

        let mut registrations = Vec::new();
        let constructor_context =
            PropagatorConstructorContext::new(propagator_id, self, &mut registrations);
        let propagator = constructor.create(constructor_context);

        for registration in registrations {
            let events = propagator
                .propagation_conditions(registration.local_id)
                .events();
            self.notification_engine.subscribe(
                PropagatorVarId {
                    propagator: propagator_id,
                    variable: registration.local_id,
                },
                registration.variable,
                events,
                registration.self_notification,
            );
        }

        let priority = propagator.priority();
        let handle = self.propagators.reserve().populate(propagator);
        gourd_assert_eq_simple!(handle.propagator_id(), propagator_id);

        self.requires_full_propagation
            .accomodate(propagator_id, false);
        self.requires_full_propagation[propagator_id] = true;
        self.propagator_queue
            .enqueue_propagator(propagator_id, priority);

        handle
    }

    /// Stop a propagator from ever running again.
    ///
    /// The propagator keeps its id, but is replaced by one which does nothing and is always
    /// entailed. Only possible while no propagation is pending.
    pub fn retract_propagator(&mut self, propagator_id: PropagatorId) {
        gourd_assert_simple!(
            self.propagator_queue.is_empty(),
            "propagators can only be retracted at a fixpoint"
        );

        self.notification_engine.unsubscribe_all(propagator_id);
        let retracted = self.propagators.retract(propagator_id);
        debug!("retracted {} ({propagator_id})", retracted.name());
    }

    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    pub fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.propagators.get_propagator_mut(handle)
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.num_propagators()
    }

    pub fn propagator_status(&self, propagator_id: PropagatorId) -> PropagatorStatus {
        if self.running == Some(propagator_id) {
            PropagatorStatus::Running
        } else if self.failed == Some(propagator_id) {
            PropagatorStatus::Failed
        } else if self
            .propagator_queue
            .is_propagator_enqueued(propagator_id)
        {
            PropagatorStatus::Queued
        } else {
            PropagatorStatus::Idle
        }
    }

    /// Whether the current domains satisfy every propagator.
    ///
    /// [`Entailment::False`] as soon as one propagator is violated, [`Entailment::True`] when all
    /// of them are entailed.
    pub fn is_satisfied(&self) -> Entailment {
        let domains = self.domains();
        self.propagators
            .iter_propagators()
            .map(|propagator| propagator.is_entailed(domains))
            .fold(Entailment::True, Entailment::and)
    }

    /// A handle to the signal which interrupts [`State::propagate_to_fixed_point`].
    pub fn abort_signal(&self) -> AbortSignal {
        self.abort_signal.clone()
    }
}

/// Operations for checkpointing and propagation.
impl State {
    pub fn get_checkpoint(&self) -> usize {
        self.trailed_values.get_checkpoint()
    }

    /// Create a new checkpoint, returning the checkpoint to pass to [`State::restore_to`] to undo
    /// every change made from now on.
    ///
    /// Should only be called at a fixpoint.
    pub fn new_checkpoint(&mut self) -> usize {
        gourd_assert_simple!(
            self.propagator_queue.is_empty(),
            "can only create a checkpoint when no propagation is pending"
        );

        let checkpoint = self.get_checkpoint();
        self.trailed_values.new_checkpoint();
        self.statistics.num_checkpoints += 1;
        debug!("created checkpoint {}", checkpoint + 1);

        checkpoint
    }

    /// Undo every change made since `checkpoint` was current.
    ///
    /// Restoring the current checkpoint does nothing. Panics if `checkpoint` is later than the
    /// current checkpoint.
    pub fn restore_to(&mut self, checkpoint: usize) {
        gourd_assert_simple!(
            checkpoint <= self.get_checkpoint(),
            "cannot restore to checkpoint {checkpoint} from checkpoint {}",
            self.get_checkpoint()
        );

        if checkpoint == self.get_checkpoint() {
            return;
        }

        let from = self.get_checkpoint();
        let num_undone = self.trailed_values.synchronise(checkpoint);

        self.propagator_queue.clear();
        self.notification_engine.reset();
        self.requires_full_propagation
            .iter_mut()
            .for_each(|requires_full| *requires_full = true);
        self.failed = None;
        self.abort_signal.reset();

        let domains = Domains::new(&self.assignments, &self.trailed_values);
        for propagator in self.propagators.iter_propagators_mut() {
            propagator.synchronise(domains);
        }

        self.statistics.num_restores += 1;
        self.statistics.num_undone_writes += num_undone;
        debug!("restored checkpoint {checkpoint} from checkpoint {from}, undoing {num_undone} writes");
    }

    /// Run the enqueued propagators until no domain changes anymore.
    ///
    /// Changes made through [`ModifyDomains`] on the state since the previous call are dispatched
    /// first. A [`Contradiction`] ends the computation immediately; the state then has to be
    /// restored to an earlier checkpoint before propagating again.
    pub fn propagate_to_fixed_point(&mut self) -> Result<Fixpoint, Contradiction> {
        self.notify_subscribers(None);

        while !self.propagator_queue.is_empty() {
            if self.abort_signal.is_aborted() {
                self.statistics.num_aborts += 1;
                debug!(
                    "propagation aborted with {} propagators enqueued",
                    self.propagator_queue.len()
                );
                return Ok(Fixpoint::Aborted);
            }

            let Some(propagator_id) = self.propagator_queue.pop() else {
                break;
            };
            self.propagate(propagator_id)?;

            if self.abort_signal.is_aborted() {
                // The propagator may have returned before it was done.
                self.requires_full_propagation[propagator_id] = true;
                let priority = self.propagators[propagator_id].priority();
                self.propagator_queue
                    .enqueue_propagator(propagator_id, priority);
            }
        }

        self.notification_engine.clear_deltas();
        Ok(Fixpoint::Reached)
    }

    fn propagate(&mut self, propagator_id: PropagatorId) -> PropagationStatus {
        gourd_assert_simple!(self.running.is_none());

        let pending = self.notification_engine.take_pending(propagator_id);
        let full_propagation =
            std::mem::replace(&mut self.requires_full_propagation[propagator_id], false);

        self.running = Some(propagator_id);
        let State {
            assignments,
            trailed_values,
            propagators,
            notification_engine,
            abort_signal,
            statistics,
            ..
        } = self;
        let propagator = &mut propagators[propagator_id];

        let status = if full_propagation || !propagator.is_fine_grained() {
            statistics.num_coarse_propagations += 1;
            trace!("propagating {} ({propagator_id}) from scratch", propagator.name());

            notification_engine.fast_forward(propagator_id);
            let context = PropagationContext::new(
                assignments,
                trailed_values,
                notification_engine,
                propagator_id,
                abort_signal,
            );
            propagator.propagate(context)
        } else {
            pending.into_iter().try_for_each(|(local_id, events)| {
                statistics.num_fine_propagations += 1;
                trace!(
                    "propagating {} ({propagator_id}) on {events:?} of {local_id}",
                    propagator.name()
                );

                let context = PropagationContext::new(
                    assignments,
                    trailed_values,
                    notification_engine,
                    propagator_id,
                    abort_signal,
                );
                propagator.propagate_on_event(context, local_id, events)
            })
        };
        self.running = None;

        match status {
            Ok(()) => {
                self.notify_subscribers(Some(propagator_id));
                Ok(())
            }
            Err(contradiction) => {
                self.statistics.num_contradictions += 1;
                self.failed = Some(propagator_id);
                debug!(
                    "{} ({propagator_id}) raised a contradiction: {contradiction}{}",
                    self.propagators[propagator_id].name(),
                    self.describe_variable(&contradiction),
                );
                Err(contradiction)
            }
        }
    }

    fn notify_subscribers(&mut self, cause: Option<PropagatorId>) {
        let State {
            notification_engine,
            propagator_queue,
            propagators,
            ..
        } = self;

        notification_engine.notify_subscribers(cause, |propagator_id| {
            propagator_queue.enqueue_propagator(propagator_id, propagators[propagator_id].priority());
        });
    }

    fn describe_variable(&self, contradiction: &Contradiction) -> String {
        match contradiction {
            Contradiction::EmptyDomain(conflict) => self
                .variable_names
                .get_name(conflict.variable)
                .map(|name| format!(" ({} is {name})", conflict.variable))
                .unwrap_or_default(),
            Contradiction::Propagator(_) => String::new(),
        }
    }

    pub fn log_statistics(&self) {
        log_statistic("variables", self.assignments.num_variables());
        log_statistic("propagators", self.propagators.num_propagators());
        self.statistics.log(StatisticLogger::new("engine"));

        for (index, propagator) in self.propagators.iter_propagators().enumerate() {
            propagator.log_statistics(StatisticLogger::new(format!(
                "{}_{index}",
                propagator.name()
            )));
        }
        log_statistic_postfix();
    }
}

impl ReadDomains for State {
    fn domains(&self) -> Domains<'_> {
        Domains::new(&self.assignments, &self.trailed_values)
    }
}

/// Changes made directly on the state are decisions; subscribers are notified during the next
/// [`State::propagate_to_fixed_point`].
impl ModifyDomains for State {
    fn domain_writer(&mut self) -> DomainWriter<'_> {
        DomainWriter {
            assignments: &self.assignments,
            store: &mut self.trailed_values,
            notifications: &mut self.notification_engine,
            cause: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::*;
    use crate::propagation::DomainEvent;
    use crate::propagation::DomainEvents;
    use crate::propagation::LocalId;
    use crate::propagation::Priority;

    /// `left < right`, propagated on bounds.
    #[derive(Clone, Copy, Debug)]
    struct LessThan {
        left: DomainId,
        right: DomainId,
    }

    impl PropagatorConstructor for LessThan {
        type PropagatorImpl = LessThan;

        fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
            context.register(self.left, LocalId::from(0));
            context.register(self.right, LocalId::from(1));
            self
        }
    }

    impl Propagator for LessThan {
        fn name(&self) -> &str {
            "LessThan"
        }

        fn priority(&self) -> Priority {
            Priority::Binary
        }

        fn propagation_conditions(&self, _local_id: LocalId) -> DomainEvents {
            DomainEvents::BOUNDS
        }

        fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
            let _ = context.set_upper_bound(self.left, context.upper_bound(self.right) - 1)?;
            let _ = context.set_lower_bound(self.right, context.lower_bound(self.left) + 1)?;
            Ok(())
        }

        fn is_entailed(&self, domains: Domains) -> Entailment {
            if domains.upper_bound(self.left) < domains.lower_bound(self.right) {
                Entailment::True
            } else if domains.lower_bound(self.left) >= domains.upper_bound(self.right) {
                Entailment::False
            } else {
                Entailment::Undefined
            }
        }
    }

    /// Records every fine-grained activation it receives.
    #[derive(Debug, Default)]
    struct EventRecorder {
        variable: Option<DomainId>,
        activations: Vec<(LocalId, EnumSet<DomainEvent>)>,
        removed: Vec<(i32, i32)>,
        num_full_propagations: usize,
    }

    impl PropagatorConstructor for EventRecorder {
        type PropagatorImpl = EventRecorder;

        fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
            if let Some(variable) = self.variable {
                context.register(variable, LocalId::from(0));
            }
            self
        }
    }

    impl Propagator for EventRecorder {
        fn name(&self) -> &str {
            "EventRecorder"
        }

        fn is_fine_grained(&self) -> bool {
            true
        }

        fn propagate(&mut self, _context: PropagationContext) -> PropagationStatus {
            self.num_full_propagations += 1;
            Ok(())
        }

        fn propagate_on_event(
            &mut self,
            mut context: PropagationContext,
            local_id: LocalId,
            events: EnumSet<DomainEvent>,
        ) -> PropagationStatus {
            self.activations.push((local_id, events));
            context.for_each_removed_range(local_id, |_, lower, upper| {
                self.removed.push((lower, upper));
                Ok(())
            })
        }

        fn is_entailed(&self, _domains: Domains) -> Entailment {
            Entailment::Undefined
        }
    }

    fn recorder_on(state: &mut State, variable: DomainId) -> PropagatorHandle<EventRecorder> {
        let handle = state.add_propagator(EventRecorder {
            variable: Some(variable),
            ..Default::default()
        });
        let _ = state.propagate_to_fixed_point().expect("no contradiction");
        handle
    }

    #[test]
    fn propagators_run_until_fixpoint() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let y = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let z = state.new_integer_variable(0, 10, None).expect("valid bounds");

        let _ = state.add_propagator(LessThan { left: x, right: y });
        let _ = state.add_propagator(LessThan { left: y, right: z });

        assert_eq!(Ok(Fixpoint::Reached), state.propagate_to_fixed_point());
        assert_eq!(8, state.upper_bound(x));
        assert_eq!(9, state.upper_bound(y));
        assert_eq!(1, state.lower_bound(y));
        assert_eq!(2, state.lower_bound(z));
    }

    #[test]
    fn decisions_are_propagated_and_undone() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let y = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let _ = state.add_propagator(LessThan { left: x, right: y });
        let _ = state.propagate_to_fixed_point().expect("no contradiction");

        let checkpoint = state.new_checkpoint();
        let _ = state.set_lower_bound(x, 5).expect("non-empty domain");
        let _ = state.propagate_to_fixed_point().expect("no contradiction");
        assert_eq!(6, state.lower_bound(y));

        state.restore_to(checkpoint);
        assert_eq!(0, state.lower_bound(x));
        assert_eq!(1, state.lower_bound(y));
        assert_eq!(checkpoint, state.get_checkpoint());
    }

    #[test]
    fn contradictions_mark_the_failing_propagator() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let y = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let handle = state.add_propagator(LessThan { left: x, right: y });
        let _ = state.propagate_to_fixed_point().expect("no contradiction");

        let checkpoint = state.new_checkpoint();
        let _ = state.set_lower_bound(x, 7).expect("non-empty domain");
        let _ = state.set_upper_bound(y, 7).expect("non-empty domain");

        let contradiction = state
            .propagate_to_fixed_point()
            .expect_err("x < y cannot hold");
        assert_eq!(Some(handle.propagator_id()), contradiction.propagator());
        assert_eq!(
            PropagatorStatus::Failed,
            state.propagator_status(handle.propagator_id())
        );

        state.restore_to(checkpoint);
        assert_eq!(
            PropagatorStatus::Idle,
            state.propagator_status(handle.propagator_id())
        );
    }

    #[test]
    fn posted_propagators_are_queued() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let y = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let handle = state.add_propagator(LessThan { left: x, right: y });

        assert_eq!(
            PropagatorStatus::Queued,
            state.propagator_status(handle.propagator_id())
        );
        let _ = state.propagate_to_fixed_point().expect("no contradiction");
        assert_eq!(
            PropagatorStatus::Idle,
            state.propagator_status(handle.propagator_id())
        );
    }

    #[test]
    fn fine_grained_propagators_receive_events_and_deltas() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let handle = recorder_on(&mut state, x);

        let _ = state.remove_value(x, 5).expect("non-empty domain");
        let _ = state.set_upper_bound(x, 7).expect("non-empty domain");
        let _ = state.propagate_to_fixed_point().expect("no contradiction");

        let recorder = state.get_propagator(handle).expect("handle of an EventRecorder");
        assert_eq!(1, recorder.num_full_propagations);
        assert_eq!(
            vec![(
                LocalId::from(0),
                DomainEvent::Removal | DomainEvent::UpperBound
            )],
            recorder.activations
        );
        assert_eq!(vec![(5, 5), (8, 10)], recorder.removed);
    }

    #[test]
    fn restoring_requires_a_full_propagation() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let handle = recorder_on(&mut state, x);

        let checkpoint = state.new_checkpoint();
        let _ = state.remove_value(x, 3).expect("non-empty domain");
        let _ = state.propagate_to_fixed_point().expect("no contradiction");
        state.restore_to(checkpoint);

        let _ = state.remove_value(x, 4).expect("non-empty domain");
        let _ = state.propagate_to_fixed_point().expect("no contradiction");

        let recorder = state.get_propagator(handle).expect("handle of an EventRecorder");
        assert_eq!(2, recorder.num_full_propagations);
        assert_eq!(vec![(3, 3)], recorder.removed);
    }

    #[test]
    fn aborted_propagation_can_be_resumed() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let y = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let _ = state.add_propagator(LessThan { left: x, right: y });

        let signal = state.abort_signal();
        signal.abort();
        assert_eq!(Ok(Fixpoint::Aborted), state.propagate_to_fixed_point());
        assert_eq!(10, state.upper_bound(x));

        signal.reset();
        assert_eq!(Ok(Fixpoint::Reached), state.propagate_to_fixed_point());
        assert_eq!(9, state.upper_bound(x));
    }

    #[test]
    fn entailment_is_folded_over_propagators() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let y = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let _ = state.add_propagator(LessThan { left: x, right: y });
        let _ = state.propagate_to_fixed_point().expect("no contradiction");
        assert_eq!(Entailment::Undefined, state.is_satisfied());

        let _ = state.set_upper_bound(x, 2).expect("non-empty domain");
        let _ = state.set_lower_bound(y, 3).expect("non-empty domain");
        assert_eq!(Entailment::True, state.is_satisfied());
    }

    #[test]
    fn retracted_propagators_no_longer_filter() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let y = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let handle = state.add_propagator(LessThan { left: x, right: y });
        let _ = state.propagate_to_fixed_point().expect("no contradiction");

        state.retract_propagator(handle.propagator_id());
        let _ = state.set_lower_bound(x, 9).expect("non-empty domain");
        let _ = state.set_upper_bound(y, 3).expect("non-empty domain");

        assert_eq!(Ok(Fixpoint::Reached), state.propagate_to_fixed_point());
        assert_eq!(Entailment::True, state.is_satisfied());
        assert!(state.get_propagator(handle).is_none());
    }

    #[test]
    fn variable_names_are_unique() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 1, Some("x")).expect("fresh name");

        assert_eq!(Some("x"), state.variable_name(x));
        assert_eq!(Some(x.variable_id()), state.variable_by_name("x"));
        assert_eq!(
            Err(ModelError::DuplicateName("x".to_owned())),
            state.new_set_variable(&[1, 2], &[], Some("x"))
        );
        assert_eq!(1, state.num_variables());
    }

    #[test]
    fn instantiating_a_set_fixes_kernel_and_envelope() {
        let mut state = State::default();
        let set = state
            .new_set_variable(&[1, 2, 3, 4], &[2], None)
            .expect("kernel within envelope");
        let checkpoint = state.new_checkpoint();

        assert_eq!(Ok(true), state.instantiate_set(set, &[2, 3]));
        assert_eq!(vec![2, 3], state.kernel_values(set).collect::<Vec<_>>());
        assert_eq!(vec![2, 3], state.envelope_values(set).collect::<Vec<_>>());

        state.restore_to(checkpoint);
        assert!(state.instantiate_set(set, &[1, 5]).is_err());
        assert_eq!(vec![2], state.kernel_values(set).collect::<Vec<_>>());
        assert_eq!(4, state.envelope_size(set));
    }

    #[test]
    fn failed_instantiation_leaves_the_set_untouched() {
        let mut state = State::default();
        let set = state
            .new_set_variable(&[1, 2, 3], &[3], None)
            .expect("kernel within envelope");

        assert!(state.instantiate_set(set, &[1]).is_err());
        assert!(state.instantiate_set(set, &[3, 7]).is_err());

        assert_eq!(vec![3], state.kernel_values(set).collect::<Vec<_>>());
        assert_eq!(vec![1, 2, 3], state.envelope_values(set).collect::<Vec<_>>());
        assert_eq!(Ok(Fixpoint::Reached), state.propagate_to_fixed_point());
    }

    #[test]
    fn restoring_the_current_checkpoint_does_nothing() {
        let mut state = State::default();
        let x = state.new_integer_variable(0, 10, None).expect("valid bounds");
        let _ = state.new_checkpoint();
        let _ = state.set_lower_bound(x, 3).expect("non-empty domain");

        state.restore_to(state.get_checkpoint());
        assert_eq!(3, state.lower_bound(x));
    }

    #[test]
    #[should_panic]
    fn restoring_a_future_checkpoint_panics() {
        let mut state = State::default();
        state.restore_to(1);
    }
}
