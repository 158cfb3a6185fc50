use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Domains;
use super::PropagationContext;
use super::Propagator;
use super::PropagatorId;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::containers::KeyedVec;
use crate::containers::Slot;

/// Owns every propagator of a [`State`](crate::engine::State), retracted ones included, so that
/// a [`PropagatorId`] stays valid for the lifetime of the state.
#[derive(Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
}

/// A [`PropagatorId`] which remembers the type of the propagator behind it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub fn propagator_id(self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl PropagatorStore {
    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    pub(crate) fn iter_propagators(&self) -> impl Iterator<Item = &dyn Propagator> + '_ {
        self.propagators.iter().map(|propagator| propagator.as_ref())
    }

    pub(crate) fn iter_propagators_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Box<dyn Propagator>> + '_ {
        self.propagators.iter_mut()
    }

    /// The id the next propagator will get.
    pub(crate) fn next_handle<P>(&self) -> PropagatorHandle<P> {
        PropagatorHandle {
            id: PropagatorId(self.propagators.len() as u32),
            propagator: PhantomData,
        }
    }

    pub(crate) fn reserve<P>(&mut self) -> ReservedPropagator<'_, P> {
        ReservedPropagator {
            slot: self.propagators.new_slot(),
            propagator: PhantomData,
        }
    }

    /// Swap the propagator behind `id` for one which never filters and is always entailed,
    /// returning the retracted propagator.
    pub(crate) fn retract(&mut self, id: PropagatorId) -> Box<dyn Propagator> {
        std::mem::replace(&mut self.propagators[id], Box::new(RetractedPropagator))
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self[handle.id].downcast_ref()
    }

    pub(crate) fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self[handle.id].downcast_mut()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        self.propagators[index].as_mut()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.propagators
                    .keys()
                    .zip(self.propagators.iter().map(|propagator| propagator.name())),
            )
            .finish()
    }
}

/// The position of a propagator which is still being constructed.
pub(crate) struct ReservedPropagator<'a, P> {
    slot: Slot<'a, PropagatorId, Box<dyn Propagator>>,
    propagator: PhantomData<P>,
}

impl<P: Propagator> ReservedPropagator<'_, P> {
    pub(crate) fn populate(self, propagator: P) -> PropagatorHandle<P> {
        PropagatorHandle {
            id: self.slot.populate(Box::new(propagator)),
            propagator: PhantomData,
        }
    }
}

/// Takes the place of a retracted propagator.
#[derive(Clone, Copy, Debug)]
struct RetractedPropagator;

impl Propagator for RetractedPropagator {
    fn name(&self) -> &str {
        "Retracted"
    }

    fn propagate(&mut self, _context: PropagationContext) -> PropagationStatus {
        Ok(())
    }

    fn is_entailed(&self, _domains: Domains) -> Entailment {
        Entailment::True
    }
}
