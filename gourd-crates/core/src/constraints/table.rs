use super::Constraint;
use crate::basic_types::ModelError;
use crate::engine::variables::DomainId;
use crate::engine::State;
use crate::propagation::ReadDomains;
use crate::propagators::table::LargeTupleTable;
use crate::propagators::table::TableForwardCheckingArgs;
pub use crate::propagators::table::Tuples;

/// Creates the [`Constraint`] which restricts `variables` to the allowed [`Tuples`], or away
/// from the forbidden ones.
///
/// The tuples are stored relative to the bounds which the variables have when the constraint is
/// posted; a tuple outside of these bounds can never match.
pub fn table(variables: impl Into<Box<[DomainId]>>, tuples: Tuples) -> impl Constraint {
    Table {
        variables: variables.into(),
        tuples,
    }
}

struct Table {
    variables: Box<[DomainId]>,
    tuples: Tuples,
}

impl Constraint for Table {
    fn post(self, state: &mut State) -> Result<(), ModelError> {
        let bounds = self
            .variables
            .iter()
            .map(|&variable| (state.lower_bound(variable), state.upper_bound(variable)))
            .collect::<Vec<_>>();
        let table = LargeTupleTable::new(&self.tuples, &bounds)?;

        let _ = state.add_propagator(TableForwardCheckingArgs {
            variables: self.variables,
            table,
        });
        Ok(())
    }
}
