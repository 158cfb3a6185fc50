use enumset::EnumSet;
use itertools::Either;

use super::EmptyDomain;
use crate::basic_types::ModelError;
use crate::engine::notifications::DomainEvent;
use crate::engine::trailed::TrailedBitSet;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;

/// The widest domain which is still stored value by value.
const MAX_ENUMERATED_WIDTH: u64 = 1 << 24;

/// How the values of an integer variable are stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntegerRepresentation {
    /// Every value is stored; holes can be punched anywhere in the domain.
    #[default]
    Enumerated,
    /// Only the bounds are stored; removing a value strictly between the bounds has no effect.
    Bounds,
}

/// What a successful mutation of an [`IntegerDomain`] changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IntegerUpdate {
    pub(crate) events: EnumSet<DomainEvent>,
    /// All removed values lie within this range.
    pub(crate) removed: (i32, i32),
}

#[derive(Clone, Debug)]
pub(crate) struct IntegerDomain {
    lower_bound: TrailedInteger,
    upper_bound: TrailedInteger,
    /// The values which are still present, offset by `initial_lower_bound`; only for enumerated
    /// domains.
    values: Option<TrailedBitSet>,
    initial_lower_bound: i32,
}

impl IntegerDomain {
    pub(crate) fn new(
        store: &mut TrailedValues,
        lower_bound: i32,
        upper_bound: i32,
        representation: IntegerRepresentation,
    ) -> Result<IntegerDomain, ModelError> {
        if lower_bound > upper_bound {
            return Err(ModelError::InvalidBounds {
                lower_bound,
                upper_bound,
            });
        }

        let values = match representation {
            IntegerRepresentation::Bounds => None,
            IntegerRepresentation::Enumerated => {
                let width = (upper_bound as i64 - lower_bound as i64 + 1) as u64;
                if width > MAX_ENUMERATED_WIDTH {
                    return Err(ModelError::DomainTooLarge { width });
                }

                Some(TrailedBitSet::new(store, width as usize, 0..width as usize))
            }
        };

        Ok(IntegerDomain {
            lower_bound: store.grow(lower_bound as i64),
            upper_bound: store.grow(upper_bound as i64),
            values,
            initial_lower_bound: lower_bound,
        })
    }

    pub(crate) fn representation(&self) -> IntegerRepresentation {
        match self.values {
            Some(_) => IntegerRepresentation::Enumerated,
            None => IntegerRepresentation::Bounds,
        }
    }

    pub(crate) fn lower_bound(&self, store: &TrailedValues) -> i32 {
        store.read(self.lower_bound) as i32
    }

    pub(crate) fn upper_bound(&self, store: &TrailedValues) -> i32 {
        store.read(self.upper_bound) as i32
    }

    pub(crate) fn is_fixed(&self, store: &TrailedValues) -> bool {
        self.lower_bound(store) == self.upper_bound(store)
    }

    pub(crate) fn contains(&self, store: &TrailedValues, value: i32) -> bool {
        if value < self.lower_bound(store) || value > self.upper_bound(store) {
            return false;
        }

        match &self.values {
            Some(values) => values.contains(store, self.offset(value)),
            None => true,
        }
    }

    pub(crate) fn size(&self, store: &TrailedValues) -> usize {
        match &self.values {
            Some(values) => values.len(store),
            None => (self.upper_bound(store) as i64 - self.lower_bound(store) as i64 + 1) as usize,
        }
    }

    pub(crate) fn iter<'a>(&'a self, store: &'a TrailedValues) -> impl Iterator<Item = i32> + 'a {
        match &self.values {
            Some(values) => Either::Left(
                values
                    .iter(store)
                    .map(|index| self.value_at(index)),
            ),
            None => Either::Right(self.lower_bound(store)..=self.upper_bound(store)),
        }
    }

    pub(crate) fn set_lower_bound(
        &self,
        store: &mut TrailedValues,
        value: i32,
    ) -> Result<Option<IntegerUpdate>, EmptyDomain> {
        let lower_bound = self.lower_bound(store);
        let upper_bound = self.upper_bound(store);
        if value <= lower_bound {
            return Ok(None);
        }
        if value > upper_bound {
            return Err(EmptyDomain);
        }

        let new_lower_bound = match &self.values {
            Some(values) => {
                // The upper bound is present, so a successor always exists.
                let index = values
                    .next_set_bit(store, self.offset(value))
                    .ok_or(EmptyDomain)?;
                let new_lower_bound = self.value_at(index);
                for removed in lower_bound..new_lower_bound {
                    let _ = values.remove(store, self.offset(removed));
                }
                new_lower_bound
            }
            None => value,
        };
        store.assign(self.lower_bound, new_lower_bound as i64);

        let mut events = DomainEvent::LowerBound | DomainEvent::Removal;
        if new_lower_bound == upper_bound {
            events |= DomainEvent::Assign;
        }
        Ok(Some(IntegerUpdate {
            events,
            removed: (lower_bound, new_lower_bound - 1),
        }))
    }

    pub(crate) fn set_upper_bound(
        &self,
        store: &mut TrailedValues,
        value: i32,
    ) -> Result<Option<IntegerUpdate>, EmptyDomain> {
        let lower_bound = self.lower_bound(store);
        let upper_bound = self.upper_bound(store);
        if value >= upper_bound {
            return Ok(None);
        }
        if value < lower_bound {
            return Err(EmptyDomain);
        }

        let new_upper_bound = match &self.values {
            Some(values) => {
                let index = values
                    .previous_set_bit(store, self.offset(value))
                    .ok_or(EmptyDomain)?;
                let new_upper_bound = self.value_at(index);
                for removed in new_upper_bound + 1..=upper_bound {
                    let _ = values.remove(store, self.offset(removed));
                }
                new_upper_bound
            }
            None => value,
        };
        store.assign(self.upper_bound, new_upper_bound as i64);

        let mut events = DomainEvent::UpperBound | DomainEvent::Removal;
        if new_upper_bound == lower_bound {
            events |= DomainEvent::Assign;
        }
        Ok(Some(IntegerUpdate {
            events,
            removed: (new_upper_bound + 1, upper_bound),
        }))
    }

    pub(crate) fn remove_value(
        &self,
        store: &mut TrailedValues,
        value: i32,
    ) -> Result<Option<IntegerUpdate>, EmptyDomain> {
        if !self.contains(store, value) {
            return Ok(None);
        }
        if self.is_fixed(store) {
            return Err(EmptyDomain);
        }

        if value == self.lower_bound(store) {
            return self.set_lower_bound(store, value + 1);
        }
        if value == self.upper_bound(store) {
            return self.set_upper_bound(store, value - 1);
        }

        match &self.values {
            Some(values) => {
                let _ = values.remove(store, self.offset(value));
                Ok(Some(IntegerUpdate {
                    events: EnumSet::only(DomainEvent::Removal),
                    removed: (value, value),
                }))
            }
            None => Ok(None),
        }
    }

    fn offset(&self, value: i32) -> usize {
        (value as i64 - self.initial_lower_bound as i64) as usize
    }

    fn value_at(&self, index: usize) -> i32 {
        (self.initial_lower_bound as i64 + index as i64) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enumerated(store: &mut TrailedValues, lower_bound: i32, upper_bound: i32) -> IntegerDomain {
        IntegerDomain::new(store, lower_bound, upper_bound, IntegerRepresentation::Enumerated)
            .expect("valid bounds")
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut store = TrailedValues::default();

        let result = IntegerDomain::new(&mut store, 3, 1, IntegerRepresentation::Bounds);

        assert!(matches!(
            result,
            Err(ModelError::InvalidBounds {
                lower_bound: 3,
                upper_bound: 1
            })
        ));
    }

    #[test]
    fn lower_bound_skips_holes() {
        let mut store = TrailedValues::default();
        let domain = enumerated(&mut store, 0, 10);
        let _ = domain.remove_value(&mut store, 3).expect("non-empty");
        let _ = domain.remove_value(&mut store, 4).expect("non-empty");

        let update = domain
            .set_lower_bound(&mut store, 3)
            .expect("non-empty")
            .expect("domain changed");

        assert_eq!(5, domain.lower_bound(&store));
        assert_eq!((0, 4), update.removed);
        assert_eq!(6, domain.size(&store));
    }

    #[test]
    fn tightening_onto_the_other_bound_assigns() {
        let mut store = TrailedValues::default();
        let domain = enumerated(&mut store, 1, 4);

        let update = domain
            .set_upper_bound(&mut store, 1)
            .expect("non-empty")
            .expect("domain changed");

        assert_eq!(
            DomainEvent::UpperBound | DomainEvent::Removal | DomainEvent::Assign,
            update.events
        );
        assert!(domain.is_fixed(&store));
    }

    #[test]
    fn emptying_a_domain_leaves_it_unchanged() {
        let mut store = TrailedValues::default();
        let domain = enumerated(&mut store, 1, 4);

        assert_eq!(Err(EmptyDomain), domain.set_lower_bound(&mut store, 5));
        assert_eq!(Err(EmptyDomain), domain.set_upper_bound(&mut store, 0));

        assert_eq!(vec![1, 2, 3, 4], domain.iter(&store).collect::<Vec<_>>());
    }

    #[test]
    fn removing_the_last_value_fails() {
        let mut store = TrailedValues::default();
        let domain = enumerated(&mut store, 2, 2);

        assert_eq!(Err(EmptyDomain), domain.remove_value(&mut store, 2));
        assert_eq!(Ok(None), domain.remove_value(&mut store, 7));
    }

    #[test]
    fn bounds_domains_ignore_interior_removals() {
        let mut store = TrailedValues::default();
        let domain =
            IntegerDomain::new(&mut store, 0, 5, IntegerRepresentation::Bounds).expect("valid");

        assert_eq!(Ok(None), domain.remove_value(&mut store, 2));
        assert!(domain.contains(&store, 2));

        let update = domain
            .remove_value(&mut store, 0)
            .expect("non-empty")
            .expect("domain changed");
        assert_eq!(1, domain.lower_bound(&store));
        assert_eq!((0, 0), update.removed);
    }

    #[test]
    fn removals_are_undone_on_synchronise() {
        let mut store = TrailedValues::default();
        let domain = enumerated(&mut store, -3, 3);

        store.new_checkpoint();
        let _ = domain.remove_value(&mut store, 0).expect("non-empty");
        let _ = domain.set_upper_bound(&mut store, 1).expect("non-empty");
        assert_eq!(vec![-3, -2, -1, 1], domain.iter(&store).collect::<Vec<_>>());

        let _ = store.synchronise(0);

        assert_eq!(7, domain.size(&store));
        assert!(domain.contains(&store, 0));
    }

    #[test]
    fn very_wide_domains_cannot_be_enumerated() {
        let mut store = TrailedValues::default();

        let result = IntegerDomain::new(
            &mut store,
            i32::MIN,
            i32::MAX,
            IntegerRepresentation::Enumerated,
        );

        assert!(matches!(result, Err(ModelError::DomainTooLarge { .. })));
    }
}
