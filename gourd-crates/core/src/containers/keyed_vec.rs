use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// Implemented by the identifiers which index a [`KeyedVec`].
pub trait StorageKey: Clone {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

/// A `Vec<Value>` which is indexed by `Key` instead of `usize`.
///
/// Variables, propagators and trailed cells each have their own key type, so the storage of one
/// cannot be indexed with the identifier of another.
#[derive(Debug, Hash, PartialEq, Eq)]
pub struct KeyedVec<Key, Value> {
    elements: Vec<Value>,
    key: PhantomData<Key>,
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        KeyedVec {
            elements: Vec::new(),
            key: PhantomData,
        }
    }
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        KeyedVec {
            elements: self.elements.clone(),
            key: PhantomData,
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append `value`, returning its key.
    pub fn push(&mut self, value: Value) -> Key {
        let key = Key::create_from_index(self.elements.len());
        self.elements.push(value);
        key
    }

    /// Reserve the next key, for a value which has to know its key before it exists.
    pub fn new_slot(&mut self) -> Slot<'_, Key, Value> {
        Slot { vec: self }
    }

    pub fn get(&self, key: Key) -> Option<&Value> {
        self.elements.get(key.index())
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> {
        (0..self.elements.len()).map(Key::create_from_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'_ Value> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &'_ mut Value> {
        self.elements.iter_mut()
    }
}

impl<Key: StorageKey, Value: Clone> KeyedVec<Key, Value> {
    /// Grow the vector with copies of `filler` until `key` is a valid index.
    pub fn accomodate(&mut self, key: Key, filler: Value) {
        let required = key.index() + 1;
        if self.elements.len() < required {
            self.elements.resize(required, filler);
        }
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Value {
        &self.elements[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Value {
        &mut self.elements[key.index()]
    }
}

/// The next position of a [`KeyedVec`], handed out before its value is known.
#[derive(Debug)]
pub struct Slot<'a, Key, Value> {
    vec: &'a mut KeyedVec<Key, Value>,
}

impl<Key: StorageKey, Value> Slot<'_, Key, Value> {
    pub fn key(&self) -> Key {
        Key::create_from_index(self.vec.len())
    }

    pub fn populate(self, value: Value) -> Key {
        self.vec.push(value)
    }
}
