use super::TrailedInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

/// The backtrackable store: a collection of `i64` cells whose writes are undone when restoring
/// to an earlier checkpoint.
///
/// Every piece of mutable search state (domains, incremental propagator state) lives in this
/// store, which makes restoring a checkpoint a single pass over the trail.
#[derive(Default, Debug, Clone)]
pub struct TrailedValues {
    /// The cell and the value it held before each write.
    trail: Trail<(TrailedInteger, i64)>,
    values: KeyedVec<TrailedInteger, i64>,
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    /// Undo every write made after `new_checkpoint` was created.
    ///
    /// Returns the number of writes which were undone.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> usize {
        let mut num_undone = 0;
        for (trailed_integer, old_value) in self.trail.synchronise(new_checkpoint) {
            self.values[trailed_integer] = old_value;
            num_undone += 1;
        }
        num_undone
    }

    fn write(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }
        self.trail.push((trailed_integer, old_value));
        self.values[trailed_integer] = value;
    }

    pub(crate) fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.write(trailed_integer, self.values[trailed_integer] + addition);
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.write(trailed_integer, value);
    }
}

#[cfg(test)]
mod tests {
    use super::TrailedValues;

    #[test]
    fn writes_are_undone_per_checkpoint() {
        let mut store = TrailedValues::default();
        let cell = store.grow(0);

        store.new_checkpoint();
        store.add_assign(cell, 5);
        store.add_assign(cell, 5);
        assert_eq!(store.read(cell), 10);

        store.new_checkpoint();
        store.add_assign(cell, 1);
        assert_eq!(store.read(cell), 11);

        assert_eq!(1, store.synchronise(1));
        assert_eq!(store.read(cell), 10);

        assert_eq!(2, store.synchronise(0));
        assert_eq!(store.read(cell), 0);
    }

    #[test]
    fn writing_the_current_value_is_not_recorded() {
        let mut store = TrailedValues::default();
        let cell = store.grow(3);

        store.new_checkpoint();
        store.assign(cell, 3);

        assert_eq!(0, store.synchronise(0));
    }

    #[test]
    fn cells_created_after_a_checkpoint_keep_their_initial_value() {
        let mut store = TrailedValues::default();
        store.new_checkpoint();
        let cell = store.grow(7);
        store.assign(cell, 8);

        let _ = store.synchronise(0);

        assert_eq!(7, store.read(cell));
    }
}
