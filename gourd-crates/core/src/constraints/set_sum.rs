use super::Constraint;
use crate::basic_types::ModelError;
use crate::engine::variables::DomainId;
use crate::engine::variables::SetVariable;
use crate::engine::State;
use crate::propagators::SetNotEmptyArgs;
use crate::propagators::SetSumArgs;

/// Creates the [`Constraint`] `sum = \sum_{v in set} v`.
///
/// If `not_empty` holds, the set must also contain at least one value.
pub fn set_sum(set: SetVariable, sum: DomainId, not_empty: bool) -> impl Constraint {
    SetSum {
        set,
        sum,
        not_empty,
    }
}

struct SetSum {
    set: SetVariable,
    sum: DomainId,
    not_empty: bool,
}

impl Constraint for SetSum {
    fn post(self, state: &mut State) -> Result<(), ModelError> {
        let SetSum {
            set,
            sum,
            not_empty,
        } = self;

        let _ = state.add_propagator(SetSumArgs {
            set,
            sum,
            not_empty,
        });
        if not_empty {
            let _ = state.add_propagator(SetNotEmptyArgs { set });
        }
        Ok(())
    }
}
