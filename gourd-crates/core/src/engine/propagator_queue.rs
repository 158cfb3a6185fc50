use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::gourd_assert_moderate;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;

/// One FIFO queue per [`Priority`]; the non-empty queue with the most urgent priority is served
/// first. A propagator is in at most one queue at a time.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<u32>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        Self::new(Priority::NUM_LEVELS)
    }
}

impl PropagatorQueue {
    pub(crate) fn new(num_priority_levels: u32) -> PropagatorQueue {
        PropagatorQueue {
            queues: vec![VecDeque::new(); num_priority_levels as usize],
            is_enqueued: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.num_enqueued
    }

    /// Enqueue the propagator unless it is already waiting.
    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        gourd_assert_moderate!((priority as usize) < self.queues.len());

        if self.is_propagator_enqueued(propagator_id) {
            return;
        }

        self.is_enqueued.accomodate(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.num_enqueued += 1;

        if self.queues[priority as usize].is_empty() {
            self.present_priorities.push(Reverse(priority as u32));
        }
        self.queues[priority as usize].push_back(propagator_id);
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let &Reverse(top_priority) = self.present_priorities.peek()?;
        let top_priority = top_priority as usize;
        gourd_assert_moderate!(!self.queues[top_priority].is_empty());

        let propagator_id = self.queues[top_priority].pop_front()?;
        self.is_enqueued[propagator_id] = false;
        self.num_enqueued -= 1;

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        Some(propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(priority)) = self.present_priorities.pop() {
            self.queues[priority as usize].clear();
        }

        for is_propagator_enqueued in self.is_enqueued.iter_mut() {
            *is_propagator_enqueued = false;
        }

        self.num_enqueued = 0;
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }
}
