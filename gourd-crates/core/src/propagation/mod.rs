//! The building blocks for propagators.
//!
//! A propagator removes values from the domains of its variables which cannot be part of any
//! solution of its constraint, or reports a [`Contradiction`](crate::basic_types::Contradiction)
//! when no solution is left.
//!
//! # Coarse and fine-grained propagation
//!
//! Every propagator implements [`Propagator::propagate`], which filters from the current domains
//! alone. This is the only hook which is called for coarse-grained propagators, and it is also
//! used for the first activation of every propagator after it is posted or after the engine
//! restored a checkpoint.
//!
//! A fine-grained propagator (see [`Propagator::is_fine_grained`]) is instead activated through
//! [`Propagator::propagate_on_event`], once per subscription slot which received events. It can
//! read exactly which elements changed since its previous activation through
//! [`PropagationContext::for_each_delta`] and its typed variants, and maintain incremental state
//! in trailed cells obtained from
//! [`PropagatorConstructorContext::new_trailed_integer`].
//!
//! # Adding a propagator
//!
//! 1. Implement [`Propagator`] for the propagator struct.
//! 2. Implement [`PropagatorConstructor`] for its arguments; the constructor registers the
//!    variables of the propagator with a [`LocalId`] each.
//! 3. Return the events each slot cares about from [`Propagator::propagation_conditions`].
//! 4. Post it with [`State::add_propagator`](crate::engine::State::add_propagator).

mod constructor;
mod contexts;
mod local_id;
mod propagator;
mod propagator_id;
mod propagator_var_id;
mod store;

pub use constructor::*;
pub use contexts::*;
pub use local_id::*;
pub use propagator::*;
pub use propagator_id::*;
pub(crate) use propagator_var_id::*;
pub use store::PropagatorHandle;
pub(crate) use store::*;

pub use crate::engine::domains::Domains;
pub use crate::engine::domains::ModifyDomains;
pub use crate::engine::domains::ReadDomains;
pub use crate::engine::notifications::DeltaKind;
pub use crate::engine::notifications::DomainEvent;
pub use crate::engine::notifications::DomainEvents;
pub use crate::engine::notifications::SelfNotification;
