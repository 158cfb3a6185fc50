use crate::containers::StorageKey;

/// A handle to a backtrackable cell in the [`TrailedValues`](super::TrailedValues) store.
///
/// The handle is only meaningful for the store which created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}
