use std::ops::Range;

use enum_map::EnumMap;

use super::DeltaKind;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::engine::variables::VariableId;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorVarId;

/// A single element-level change.
///
/// Set and graph records describe one element (`lower == upper`); integer records describe a
/// range of removed values, some of which may already have been absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DeltaEntry {
    pub(crate) lower: i32,
    pub(crate) upper: i32,
    pub(crate) cause: Option<PropagatorId>,
}

/// The element-level changes made to each variable since the log was last cleared, together with
/// a read cursor for every subscription slot which consumes them.
///
/// A slot claims the records between its cursor and the end of the log; the cursor then moves
/// to the end, so every record is seen once per slot.
#[derive(Default, Debug, Clone)]
pub(crate) struct DeltaLog {
    entries: KeyedVec<VariableId, EnumMap<DeltaKind, Vec<DeltaEntry>>>,
    touched: Vec<VariableId>,
    cursors: HashMap<(PropagatorVarId, DeltaKind), usize>,
}

impl DeltaLog {
    pub(crate) fn grow(&mut self) {
        let _ = self.entries.push(EnumMap::default());
    }

    pub(crate) fn record(&mut self, variable: VariableId, kind: DeltaKind, entry: DeltaEntry) {
        let logs = &mut self.entries[variable];
        if logs.values().all(Vec::is_empty) {
            self.touched.push(variable);
        }
        logs[kind].push(entry);
    }

    pub(crate) fn len(&self, variable: VariableId, kind: DeltaKind) -> usize {
        self.entries[variable][kind].len()
    }

    pub(crate) fn entry(&self, variable: VariableId, kind: DeltaKind, index: usize) -> DeltaEntry {
        self.entries[variable][kind][index]
    }

    /// The records `reader` has not seen yet; afterwards the reader is up to date.
    ///
    /// The range is frozen: records appended while the caller processes it are left for the
    /// next claim.
    pub(crate) fn claim(
        &mut self,
        reader: PropagatorVarId,
        variable: VariableId,
        kind: DeltaKind,
    ) -> Range<usize> {
        let end = self.len(variable, kind);
        let cursor = self.cursors.entry((reader, kind)).or_insert(0);
        let start = (*cursor).min(end);
        *cursor = end;
        start..end
    }

    /// Mark every record on `variable` as seen by `reader`.
    pub(crate) fn fast_forward(&mut self, reader: PropagatorVarId, variable: VariableId) {
        for (kind, entries) in self.entries[variable].iter() {
            if entries.is_empty() {
                let _ = self.cursors.remove(&(reader, kind));
            } else {
                let _ = self.cursors.insert((reader, kind), entries.len());
            }
        }
    }

    /// Forget all records and cursors.
    pub(crate) fn clear(&mut self) {
        for variable in self.touched.drain(..) {
            for entries in self.entries[variable].values_mut() {
                entries.clear();
            }
        }
        self.cursors.clear();
    }
}
