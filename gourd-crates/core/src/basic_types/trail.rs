use std::iter::Rev;
use std::vec::Drain;

use crate::gourd_assert_simple;

/// An undo log which is cut into segments, one per checkpoint.
///
/// Checkpoint `c` consists of the entries pushed while `c` was the current checkpoint; going back
/// to checkpoint `c` hands back the entries of every later checkpoint, most recent first.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    entries: Vec<T>,
    /// `segment_starts[c]` is the length of `entries` when checkpoint `c + 1` was created.
    segment_starts: Vec<usize>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            entries: Vec::new(),
            segment_starts: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn get_checkpoint(&self) -> usize {
        self.segment_starts.len()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.segment_starts.push(self.entries.len());
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Make `checkpoint` the current checkpoint again, draining the entries of all later
    /// checkpoints in reverse order of pushing.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) -> Rev<Drain<'_, T>> {
        gourd_assert_simple!(
            checkpoint < self.get_checkpoint(),
            "cannot synchronise to checkpoint {checkpoint} from checkpoint {}",
            self.get_checkpoint()
        );

        let start = self.segment_starts[checkpoint];
        self.segment_starts.truncate(checkpoint);
        self.entries.drain(start..).rev()
    }
}
