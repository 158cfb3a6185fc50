use super::LargeTupleTable;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::create_statistics_struct;
use crate::engine::variables::DomainId;
use crate::gourd_assert_simple;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::ModifyDomains;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::Priority;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

#[derive(Clone, Debug)]
pub(crate) struct TableForwardCheckingArgs {
    pub(crate) variables: Box<[DomainId]>,
    pub(crate) table: LargeTupleTable,
}

impl PropagatorConstructor for TableForwardCheckingArgs {
    type PropagatorImpl = TableForwardCheckingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let TableForwardCheckingArgs { variables, table } = self;
        gourd_assert_simple!(variables.len() == table.arity());

        for (index, variable) in variables.iter().enumerate() {
            context.register(*variable, LocalId::from(index as u32));
        }

        TableForwardCheckingPropagator {
            tuple: vec![0; variables.len()].into(),
            variables,
            table,
            statistics: TableStatistics::default(),
        }
    }
}

create_statistics_struct!(TableStatistics {
    num_checks: usize,
    num_removals: usize,
});

/// Forward checking for a table: once all but one variable are fixed, the values of the last
/// variable which do not complete an allowed tuple are removed.
#[derive(Clone, Debug)]
pub(crate) struct TableForwardCheckingPropagator {
    variables: Box<[DomainId]>,
    table: LargeTupleTable,
    /// Scratch space holding the values of the fixed variables.
    tuple: Box<[i32]>,
    statistics: TableStatistics,
}

impl Propagator for TableForwardCheckingPropagator {
    fn name(&self) -> &str {
        "TableForwardChecking"
    }

    fn priority(&self) -> Priority {
        Priority::Linear
    }

    fn propagation_conditions(&self, _local_id: LocalId) -> DomainEvents {
        DomainEvents::ASSIGN
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let mut unfixed = None;
        for (index, &variable) in self.variables.iter().enumerate() {
            match context.fixed_value(variable) {
                Some(value) => self.tuple[index] = value,
                None if unfixed.is_none() => unfixed = Some(index),
                None => return Ok(()),
            }
        }

        let Some(index) = unfixed else {
            self.statistics.num_checks += 1;
            if self.table.is_consistent(&self.tuple) {
                return Ok(());
            }
            return Err(context.conflict("the assignment is not allowed by the table"));
        };

        let variable = self.variables[index];
        let values = context.iterate_domain(variable).collect::<Vec<_>>();
        for value in values {
            self.tuple[index] = value;
            self.statistics.num_checks += 1;
            if !self.table.is_consistent(&self.tuple) {
                self.statistics.num_removals += 1;
                let _ = context.remove_value(variable, value)?;
            }
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let tuple = self
            .variables
            .iter()
            .map(|&variable| domains.fixed_value(variable))
            .collect::<Option<Vec<_>>>();

        match tuple {
            Some(tuple) if self.table.is_consistent(&tuple) => Entailment::True,
            Some(_) => Entailment::False,
            None => Entailment::Undefined,
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
