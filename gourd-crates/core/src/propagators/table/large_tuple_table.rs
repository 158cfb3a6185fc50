use log::warn;

use super::Tuples;
use crate::basic_types::ModelError;
use crate::containers::HashMap;
use crate::gourd_assert_moderate;

const PAGE_BITS: u32 = 12;
const PAGE_MASK: u64 = (1 << PAGE_BITS) - 1;
const WORDS_PER_PAGE: usize = (1 << PAGE_BITS) / 64;

/// A set of tuples over a cross product of integer intervals, of which only the pages holding at
/// least one tuple are stored.
///
/// A tuple is addressed in mixed radix: value `i` contributes `(value_i - lower_bound_i) *
/// stride_i`, where `stride_i` is the product of the widths of the intervals before `i`. The
/// address selects a page by its high bits and a bit within the page by its low bits.
#[derive(Clone, Debug)]
pub(crate) struct LargeTupleTable {
    lower_bounds: Box<[i32]>,
    upper_bounds: Box<[i32]>,
    strides: Box<[u64]>,
    pages: HashMap<u64, Box<[u64]>>,
    feasible: bool,
}

impl LargeTupleTable {
    /// Store the `tuples` which lie within `bounds`; the others can never match.
    ///
    /// Fails if a tuple does not have one value per interval, or if the cross product of the
    /// intervals has more elements than fit in a `u64`.
    pub(crate) fn new(tuples: &Tuples, bounds: &[(i32, i32)]) -> Result<Self, ModelError> {
        let mut strides = Vec::with_capacity(bounds.len());
        let mut num_addresses: u64 = 1;
        for &(lower_bound, upper_bound) in bounds {
            if lower_bound > upper_bound {
                return Err(ModelError::InvalidBounds {
                    lower_bound,
                    upper_bound,
                });
            }

            strides.push(num_addresses);
            let width = (upper_bound as i64 - lower_bound as i64 + 1) as u64;
            num_addresses = num_addresses
                .checked_mul(width)
                .ok_or(ModelError::TableAddressOverflow)?;
        }

        let mut table = LargeTupleTable {
            lower_bounds: bounds.iter().map(|&(lower_bound, _)| lower_bound).collect(),
            upper_bounds: bounds.iter().map(|&(_, upper_bound)| upper_bound).collect(),
            strides: strides.into(),
            pages: HashMap::default(),
            feasible: tuples.is_feasible(),
        };

        let mut num_outside = 0;
        for (index, tuple) in tuples.iter().enumerate() {
            if tuple.len() != bounds.len() {
                return Err(ModelError::TupleArity {
                    index,
                    expected: bounds.len(),
                    actual: tuple.len(),
                });
            }

            match table.address(tuple) {
                Some(address) => table.insert(address),
                None => num_outside += 1,
            }
        }

        if num_outside > 0 && num_outside == tuples.len() {
            warn!("all {num_outside} tuples of a table lie outside the variable bounds");
        }

        Ok(table)
    }

    pub(crate) fn arity(&self) -> usize {
        self.strides.len()
    }

    /// Whether `tuple` is one of the stored tuples.
    pub(crate) fn check_tuple(&self, tuple: &[i32]) -> bool {
        gourd_assert_moderate!(tuple.len() == self.arity());

        let Some(address) = self.address(tuple) else {
            return false;
        };
        let offset = (address & PAGE_MASK) as usize;
        self.pages
            .get(&(address >> PAGE_BITS))
            .is_some_and(|words| words[offset / 64] & (1 << (offset % 64)) != 0)
    }

    /// Whether `tuple` is an allowed assignment.
    pub(crate) fn is_consistent(&self, tuple: &[i32]) -> bool {
        self.check_tuple(tuple) == self.feasible
    }

    fn address(&self, tuple: &[i32]) -> Option<u64> {
        let mut address = 0;
        for (index, &value) in tuple.iter().enumerate() {
            if value < self.lower_bounds[index] || value > self.upper_bounds[index] {
                return None;
            }
            address += (value as i64 - self.lower_bounds[index] as i64) as u64 * self.strides[index];
        }
        Some(address)
    }

    fn insert(&mut self, address: u64) {
        let offset = (address & PAGE_MASK) as usize;
        let words = self
            .pages
            .entry(address >> PAGE_BITS)
            .or_insert_with(|| vec![0; WORDS_PER_PAGE].into());
        words[offset / 64] |= 1 << (offset % 64);
    }
}
