use itertools::Itertools;
use itertools::MinMaxResult;

use super::EmptyDomain;
use super::EnvelopeKernelDomain;
use crate::basic_types::ModelError;
use crate::engine::notifications::DomainEvent;
use crate::engine::trailed::TrailedBitSet;
use crate::engine::TrailedValues;

/// The widest range of values a set variable can range over.
const MAX_UNIVERSE_WIDTH: u64 = 1 << 24;

/// A set domain as a kernel and an envelope over the universe `offset..offset + capacity`,
/// where the universe spans the initial envelope.
#[derive(Clone, Debug)]
pub(crate) struct SetDomain {
    offset: i32,
    envelope: TrailedBitSet,
    kernel: TrailedBitSet,
}

impl SetDomain {
    pub(crate) fn new(
        store: &mut TrailedValues,
        envelope: &[i32],
        kernel: &[i32],
    ) -> Result<SetDomain, ModelError> {
        let (offset, width) = match envelope.iter().minmax() {
            MinMaxResult::NoElements => (0, 0),
            MinMaxResult::OneElement(&value) => (value, 1),
            MinMaxResult::MinMax(&min, &max) => (min, (max as i64 - min as i64 + 1) as u64),
        };
        if width > MAX_UNIVERSE_WIDTH {
            return Err(ModelError::DomainTooLarge { width });
        }

        let index_of = |value: i32| (value as i64 - offset as i64) as usize;
        let width = width as usize;
        let envelope = TrailedBitSet::new(store, width, envelope.iter().map(|&v| index_of(v)));
        if let Some(&value) = kernel
            .iter()
            .find(|&&value| !envelope.contains(store, index_of(value)))
        {
            return Err(ModelError::KernelNotInEnvelope(value));
        }

        Ok(SetDomain {
            offset,
            kernel: TrailedBitSet::new(store, width, kernel.iter().map(|&v| index_of(v))),
            envelope,
        })
    }

    pub(crate) fn envelope_contains(&self, store: &TrailedValues, value: i32) -> bool {
        self.index(value)
            .is_some_and(|index| self.envelope.contains(store, index))
    }

    pub(crate) fn kernel_contains(&self, store: &TrailedValues, value: i32) -> bool {
        self.index(value)
            .is_some_and(|index| self.kernel.contains(store, index))
    }

    pub(crate) fn envelope_values<'a>(
        &'a self,
        store: &'a TrailedValues,
    ) -> impl Iterator<Item = i32> + 'a {
        self.envelope.iter(store).map(|index| self.value_at(index))
    }

    pub(crate) fn kernel_values<'a>(
        &'a self,
        store: &'a TrailedValues,
    ) -> impl Iterator<Item = i32> + 'a {
        self.kernel.iter(store).map(|index| self.value_at(index))
    }

    fn index(&self, value: i32) -> Option<usize> {
        let index = value as i64 - self.offset as i64;
        (index >= 0 && (index as usize) < self.envelope.capacity()).then_some(index as usize)
    }

    fn offset(&self, value: i32) -> usize {
        (value as i64 - self.offset as i64) as usize
    }

    fn value_at(&self, index: usize) -> i32 {
        (self.offset as i64 + index as i64) as i32
    }
}

impl EnvelopeKernelDomain for SetDomain {
    type Element = i32;

    const ENFORCE_EVENT: DomainEvent = DomainEvent::SetEnforce;
    const EXCLUDE_EVENT: DomainEvent = DomainEvent::SetRemove;

    fn envelope_size(&self, store: &TrailedValues) -> usize {
        self.envelope.len(store)
    }

    fn kernel_size(&self, store: &TrailedValues) -> usize {
        self.kernel.len(store)
    }

    fn in_envelope(&self, store: &TrailedValues, value: i32) -> bool {
        self.envelope_contains(store, value)
    }

    fn in_kernel(&self, store: &TrailedValues, value: i32) -> bool {
        self.kernel_contains(store, value)
    }

    fn enforce(&self, store: &mut TrailedValues, value: i32) -> Result<bool, EmptyDomain> {
        if !self.envelope_contains(store, value) {
            return Err(EmptyDomain);
        }
        Ok(self.kernel.insert(store, self.offset(value)))
    }

    fn exclude(&self, store: &mut TrailedValues, value: i32) -> Result<bool, EmptyDomain> {
        if self.kernel_contains(store, value) {
            return Err(EmptyDomain);
        }
        Ok(self
            .index(value)
            .is_some_and(|index| self.envelope.remove(store, index)))
    }

    fn encode(&self, value: i32) -> i32 {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_must_be_within_envelope() {
        let mut store = TrailedValues::default();

        let result = SetDomain::new(&mut store, &[1, 2, 3], &[4]);

        assert!(matches!(result, Err(ModelError::KernelNotInEnvelope(4))));
    }

    #[test]
    fn negative_values_are_supported() {
        let mut store = TrailedValues::default();
        let domain = SetDomain::new(&mut store, &[-5, 0, 7], &[-5]).expect("valid domain");

        assert!(domain.kernel_contains(&store, -5));
        assert!(!domain.envelope_contains(&store, -4));
        assert_eq!(vec![-5, 0, 7], domain.envelope_values(&store).collect::<Vec<_>>());
    }

    #[test]
    fn enforcing_outside_the_envelope_fails() {
        let mut store = TrailedValues::default();
        let domain = SetDomain::new(&mut store, &[1, 3], &[]).expect("valid domain");

        assert_eq!(Err(EmptyDomain), domain.enforce(&mut store, 2));
        assert_eq!(Err(EmptyDomain), domain.enforce(&mut store, 10));
        assert_eq!(Ok(true), domain.enforce(&mut store, 3));
        assert_eq!(Ok(false), domain.enforce(&mut store, 3));
    }

    #[test]
    fn removing_a_kernel_value_fails() {
        let mut store = TrailedValues::default();
        let domain = SetDomain::new(&mut store, &[1, 3], &[1]).expect("valid domain");

        assert_eq!(Err(EmptyDomain), domain.exclude(&mut store, 1));
        assert_eq!(Ok(true), domain.exclude(&mut store, 3));
        assert_eq!(Ok(false), domain.exclude(&mut store, 3));
        assert!(domain.is_fixed(&store));
    }

    #[test]
    fn an_empty_envelope_is_fixed() {
        let mut store = TrailedValues::default();
        let domain = SetDomain::new(&mut store, &[], &[]).expect("valid domain");

        assert!(domain.is_fixed(&store));
        assert_eq!(Ok(false), domain.exclude(&mut store, 0));
    }
}
