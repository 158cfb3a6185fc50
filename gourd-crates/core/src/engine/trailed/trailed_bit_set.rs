use super::TrailedInteger;
use super::TrailedValues;

const WORD_SIZE: usize = 64;

/// A fixed-capacity bit set whose words live in the [`TrailedValues`] store.
///
/// The cardinality is maintained in its own cell so that [`TrailedBitSet::len`] is constant
/// time.
#[derive(Debug, Clone)]
pub(crate) struct TrailedBitSet {
    words: Box<[TrailedInteger]>,
    cardinality: TrailedInteger,
    capacity: usize,
}

impl TrailedBitSet {
    /// Create a set which can hold the elements `0..capacity`, initially containing `elements`.
    ///
    /// The initial words are the starting values of fresh cells rather than trailed writes, so
    /// restoring any checkpoint never undoes them.
    pub(crate) fn new(
        store: &mut TrailedValues,
        capacity: usize,
        elements: impl IntoIterator<Item = usize>,
    ) -> Self {
        let mut initial_words = vec![0_u64; capacity.div_ceil(WORD_SIZE)];
        for index in elements {
            crate::gourd_assert_simple!(index < capacity);
            initial_words[index / WORD_SIZE] |= 1 << (index % WORD_SIZE);
        }

        let cardinality = initial_words
            .iter()
            .map(|word| word.count_ones() as i64)
            .sum();
        let words = initial_words
            .into_iter()
            .map(|word| store.grow(word as i64))
            .collect();

        TrailedBitSet {
            words,
            cardinality: store.grow(cardinality),
            capacity,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self, store: &TrailedValues) -> usize {
        store.read(self.cardinality) as usize
    }

    pub(crate) fn contains(&self, store: &TrailedValues, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }
        let word = read_word(store, self.words[index / WORD_SIZE]);
        word & (1 << (index % WORD_SIZE)) != 0
    }

    /// Add `index` to the set; returns whether the set changed.
    pub(crate) fn insert(&self, store: &mut TrailedValues, index: usize) -> bool {
        crate::gourd_assert_simple!(index < self.capacity);

        let cell = self.words[index / WORD_SIZE];
        let word = read_word(store, cell);
        let mask = 1 << (index % WORD_SIZE);
        if word & mask != 0 {
            return false;
        }

        store.assign(cell, (word | mask) as i64);
        store.add_assign(self.cardinality, 1);
        true
    }

    /// Remove `index` from the set; returns whether the set changed.
    pub(crate) fn remove(&self, store: &mut TrailedValues, index: usize) -> bool {
        if !self.contains(store, index) {
            return false;
        }

        let cell = self.words[index / WORD_SIZE];
        let word = read_word(store, cell);
        store.assign(cell, (word & !(1 << (index % WORD_SIZE))) as i64);
        store.add_assign(self.cardinality, -1);
        true
    }

    /// The smallest element which is at least `from`.
    pub(crate) fn next_set_bit(&self, store: &TrailedValues, from: usize) -> Option<usize> {
        if from >= self.capacity {
            return None;
        }

        let mut word_index = from / WORD_SIZE;
        let mut word = read_word(store, self.words[word_index]) & (u64::MAX << (from % WORD_SIZE));
        loop {
            if word != 0 {
                let index = word_index * WORD_SIZE + word.trailing_zeros() as usize;
                return (index < self.capacity).then_some(index);
            }
            word_index += 1;
            if word_index >= self.words.len() {
                return None;
            }
            word = read_word(store, self.words[word_index]);
        }
    }

    /// The largest element which is at most `from`.
    pub(crate) fn previous_set_bit(&self, store: &TrailedValues, from: usize) -> Option<usize> {
        if self.capacity == 0 {
            return None;
        }
        let from = from.min(self.capacity - 1);

        let mut word_index = from / WORD_SIZE;
        let mut word =
            read_word(store, self.words[word_index]) & (u64::MAX >> (WORD_SIZE - 1 - from % WORD_SIZE));
        loop {
            if word != 0 {
                return Some(word_index * WORD_SIZE + (WORD_SIZE - 1 - word.leading_zeros() as usize));
            }
            if word_index == 0 {
                return None;
            }
            word_index -= 1;
            word = read_word(store, self.words[word_index]);
        }
    }

    pub(crate) fn iter<'a>(&'a self, store: &'a TrailedValues) -> impl Iterator<Item = usize> + 'a {
        let mut next = self.next_set_bit(store, 0);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.next_set_bit(store, current + 1);
            Some(current)
        })
    }
}

fn read_word(store: &TrailedValues, cell: TrailedInteger) -> u64 {
    store.read(cell) as u64
}

#[cfg(test)]
mod tests {
    use super::TrailedBitSet;
    use crate::engine::TrailedValues;

    #[test]
    fn elements_across_words_are_iterated_in_order() {
        let mut store = TrailedValues::default();
        let set = TrailedBitSet::new(&mut store, 200, [199, 0, 63]);

        for index in [64, 130] {
            assert!(set.insert(&mut store, index));
        }

        assert_eq!(vec![0, 63, 64, 130, 199], set.iter(&store).collect::<Vec<_>>());
        assert_eq!(5, set.len(&store));
    }

    #[test]
    fn inserting_twice_does_not_change_the_cardinality() {
        let mut store = TrailedValues::default();
        let set = TrailedBitSet::new(&mut store, 10, [4, 4]);
        assert_eq!(1, set.len(&store));

        assert!(set.insert(&mut store, 5));
        assert!(!set.insert(&mut store, 5));

        assert_eq!(2, set.len(&store));
    }

    #[test]
    fn removals_are_undone_on_synchronise() {
        let mut store = TrailedValues::default();
        let set = TrailedBitSet::new(&mut store, 70, 0..70);

        store.new_checkpoint();
        assert!(set.remove(&mut store, 3));
        assert!(set.remove(&mut store, 65));
        assert!(!set.remove(&mut store, 65));
        assert_eq!(68, set.len(&store));

        let _ = store.synchronise(0);

        assert_eq!(70, set.len(&store));
        assert!(set.contains(&store, 65));
    }

    #[test]
    fn neighbouring_elements_are_found() {
        let mut store = TrailedValues::default();
        let set = TrailedBitSet::new(&mut store, 150, [10, 128]);

        assert_eq!(Some(10), set.next_set_bit(&store, 0));
        assert_eq!(Some(128), set.next_set_bit(&store, 11));
        assert_eq!(None, set.next_set_bit(&store, 129));
        assert_eq!(Some(10), set.previous_set_bit(&store, 127));
        assert_eq!(Some(128), set.previous_set_bit(&store, 149));
        assert_eq!(None, set.previous_set_bit(&store, 9));
    }

    #[test]
    fn elements_beyond_the_capacity_are_absent() {
        let mut store = TrailedValues::default();
        let set = TrailedBitSet::new(&mut store, 3, 0..3);

        assert!(!set.contains(&store, 3));
        assert!(!set.contains(&store, 1000));
    }

    #[test]
    fn initial_elements_survive_restoring_the_root() {
        let mut store = TrailedValues::default();
        store.new_checkpoint();
        let set = TrailedBitSet::new(&mut store, 100, [1, 70]);

        assert_eq!(0, store.synchronise(0));

        assert_eq!(vec![1, 70], set.iter(&store).collect::<Vec<_>>());
        assert_eq!(2, set.len(&store));
    }
}
