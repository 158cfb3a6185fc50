use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enumset::EnumSet;

use super::Domains;
use super::DomainEvent;
use super::DomainEvents;
use super::LocalId;
use super::PropagationContext;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::statistics::StatisticLogger;

// Allows going from `Box<dyn Propagator>` back to the concrete propagator through a
// `PropagatorHandle`.
impl_downcast!(Propagator);

/// A filtering algorithm for one constraint.
///
/// The required functions are [`Propagator::name`], [`Propagator::propagate`] and
/// [`Propagator::is_entailed`]. See the [`crate::propagation`] documentation for how the engine
/// uses the other hooks.
pub trait Propagator: Downcast {
    /// The name of the propagator, used for logging.
    fn name(&self) -> &str;

    /// Filter the domains of the variables of the propagator given only the current domains.
    ///
    /// Returns a [`Contradiction`](crate::basic_types::Contradiction) when a domain mutation
    /// fails, or when the propagator finds its constraint unsatisfiable.
    ///
    /// A propagator does not have to reach a fixpoint on its own; the engine calls it again as
    /// long as the domains of its variables keep changing.
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatus;

    /// Whether the engine should use [`Propagator::propagate_on_event`] for activations which
    /// are triggered by events.
    ///
    /// By default propagators are coarse-grained.
    fn is_fine_grained(&self) -> bool {
        false
    }

    /// Filter in response to `events` on the variable registered with `local_id`.
    ///
    /// Only called for fine-grained propagators, once per slot that received events since the
    /// previous activation. By default this performs a full [`Propagator::propagate`].
    fn propagate_on_event(
        &mut self,
        context: PropagationContext,
        _local_id: LocalId,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        self.propagate(context)
    }

    /// The events on the variable registered with `local_id` which should activate this
    /// propagator.
    ///
    /// Queried once, right after the propagator is created. By default, every event.
    fn propagation_conditions(&self, _local_id: LocalId) -> DomainEvents {
        DomainEvents::new(EnumSet::all())
    }

    /// Whether the current domains already decide the constraint of the propagator.
    ///
    /// This must be exact when all variables are instantiated; before that, [`Entailment::Undefined`]
    /// is always a correct answer.
    fn is_entailed(&self, domains: Domains) -> Entailment;

    /// Called after the engine restored a checkpoint, allowing the propagator to update any state
    /// which is not kept in trailed cells.
    fn synchronise(&mut self, _domains: Domains) {}

    /// The priority of the propagator; cheaper propagators should run earlier.
    ///
    /// By default [`Priority::VerySlow`].
    fn priority(&self) -> Priority {
        Priority::VerySlow
    }

    /// Log the statistics of the propagator.
    ///
    /// Structs created with [`create_statistics_struct!`](crate::create_statistics_struct) can
    /// be logged directly.
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// The urgency of a propagator, named after the typical cost of one activation.
///
/// Among enqueued propagators, one with the most urgent priority runs first; propagators with the
/// same priority run in the order in which they were enqueued.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    Unary = 0,
    Binary = 1,
    Linear = 2,
    Cubic = 3,
    #[default]
    VerySlow = 4,
}

impl Priority {
    pub(crate) const NUM_LEVELS: u32 = 5;
}

/// Where a propagator is in its life cycle, as observed from outside a fixpoint computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagatorStatus {
    /// Waiting for events.
    Idle,
    /// In the queue, waiting to be run.
    Queued,
    /// Currently filtering.
    Running,
    /// Raised the contradiction which ended the last fixpoint computation. Cleared when a
    /// checkpoint is restored.
    Failed,
}
