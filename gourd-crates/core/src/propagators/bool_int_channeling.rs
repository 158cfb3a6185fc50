use enumset::EnumSet;

use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::propagation::DomainEvent;
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

#[derive(Clone, Debug)]
pub(crate) struct BoolIntChannelingArgs {
    pub(crate) variable: DomainId,
    pub(crate) literals: Box<[Literal]>,
    pub(crate) offset: i32,
}

impl PropagatorConstructor for BoolIntChannelingArgs {
    type PropagatorImpl = BoolIntChannelingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let BoolIntChannelingArgs {
            variable,
            literals,
            offset,
        } = self;

        for (index, literal) in literals.iter().enumerate() {
            context.register(*literal, LocalId::from(index as u32));
        }
        context.register(variable, LocalId::from(literals.len() as u32));

        BoolIntChannelingPropagator {
            variable,
            literals,
            offset,
        }
    }
}

/// Propagator for `literals[i] <-> (variable = offset + i)`.
///
/// The variable is restricted to the values which have a literal. Its domain has to be
/// enumerated, so that every removed value can be reported.
#[derive(Clone, Debug)]
pub(crate) struct BoolIntChannelingPropagator {
    variable: DomainId,
    literals: Box<[Literal]>,
    offset: i32,
}

impl BoolIntChannelingPropagator {
    fn variable_id(&self) -> LocalId {
        LocalId::from(self.literals.len() as u32)
    }

    fn last_value(&self) -> i32 {
        self.offset + (self.literals.len() as i32 - 1)
    }

    fn literal(&self, value: i32) -> Literal {
        self.literals[(value - self.offset) as usize]
    }

    fn values(&self) -> impl Iterator<Item = i32> {
        self.offset..=self.last_value()
    }

    /// Push the value of a fixed literal into the variable.
    fn set_value(
        &self,
        context: &mut PropagationContext,
        value: i32,
        truth_value: bool,
    ) -> PropagationStatus {
        if truth_value {
            let _ = context.assign(self.variable, value)?;
        } else {
            let _ = context.remove_value(self.variable, value)?;
        }
        Ok(())
    }
}

impl Propagator for BoolIntChannelingPropagator {
    fn name(&self) -> &str {
        "BoolIntChanneling"
    }

    fn priority(&self) -> Priority {
        Priority::Linear
    }

    fn is_fine_grained(&self) -> bool {
        true
    }

    fn propagation_conditions(&self, local_id: LocalId) -> DomainEvents {
        if local_id == self.variable_id() {
            DomainEvents::new(DomainEvent::Removal | DomainEvent::Assign)
        } else {
            DomainEvents::ASSIGN
        }
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        if self.literals.is_empty() {
            return Err(context.conflict("no value of the variable has a literal"));
        }

        let _ = context.set_lower_bound(self.variable, self.offset)?;
        let _ = context.set_upper_bound(self.variable, self.last_value())?;

        for value in self.values() {
            if let Some(truth_value) = context.truth_value(self.literal(value)) {
                self.set_value(&mut context, value, truth_value)?;
            }
        }

        let fixed_value = context.fixed_value(self.variable);
        for value in self.values() {
            let literal = self.literal(value);
            if !context.contains(self.variable, value) {
                let _ = context.set_false(literal)?;
            } else if fixed_value == Some(value) {
                let _ = context.set_true(literal)?;
            }
        }

        Ok(())
    }

    fn propagate_on_event(
        &mut self,
        mut context: PropagationContext,
        local_id: LocalId,
        events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        if local_id == self.variable_id() {
            let (first_value, last_value) = (self.offset, self.last_value());
            context.for_each_removed_range(local_id, |context, lower, upper| {
                for value in lower.max(first_value)..=upper.min(last_value) {
                    let _ = context.set_false(self.literal(value))?;
                }
                Ok(())
            })?;

            if events.contains(DomainEvent::Assign) {
                if let Some(value) = context.fixed_value(self.variable) {
                    let _ = context.set_true(self.literal(value))?;
                }
            }
            return Ok(());
        }

        let value = self.offset + local_id.unpack() as i32;
        let Some(truth_value) = context.truth_value(self.literal(value)) else {
            return Ok(());
        };
        self.set_value(&mut context, value, truth_value)?;

        // The propagator does not hear about its own changes to the variable.
        if truth_value {
            for other in self.values().filter(|&other| other != value) {
                let _ = context.set_false(self.literal(other))?;
            }
        } else if let Some(fixed_value) = context.fixed_value(self.variable) {
            let _ = context.set_true(self.literal(fixed_value))?;
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let violated = self.values().any(|value| {
            match domains.truth_value(self.literal(value)) {
                Some(true) => !domains.contains(self.variable, value),
                Some(false) => domains.fixed_value(self.variable) == Some(value),
                None => false,
            }
        }) || self
            .values()
            .all(|value| !domains.contains(self.variable, value));
        if violated {
            return Entailment::False;
        }

        let decided = domains.fixed_value(self.variable).is_some()
            && self.values().all(|value| {
                domains.truth_value(self.literal(value))
                    == Some(domains.fixed_value(self.variable) == Some(value))
            });
        if decided {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    fn channel(
        solver: &mut TestSolver,
        variable: DomainId,
        num_literals: usize,
        offset: i32,
    ) -> Vec<Literal> {
        let literals = (0..num_literals)
            .map(|_| solver.new_literal())
            .collect::<Vec<_>>();
        let _ = solver
            .new_propagator(BoolIntChannelingArgs {
                variable,
                literals: literals.clone().into(),
                offset,
            })
            .expect("no empty domains");
        literals
    }

    #[test]
    fn variable_is_restricted_to_the_literals() {
        let mut solver = TestSolver::default();
        let variable = solver.new_variable(0, 10);
        let literals = channel(&mut solver, variable, 4, 2);

        solver.assert_bounds(variable, 2, 5);
        assert!(literals
            .iter()
            .all(|literal| solver.truth_value(*literal).is_none()));
    }

    #[test]
    fn removed_values_falsify_their_literal() {
        let mut solver = TestSolver::default();
        let variable = solver.new_variable(0, 5);
        let literals = channel(&mut solver, variable, 6, 0);

        let _ = solver.remove_value(variable, 3).expect("non-empty domain");
        let _ = solver.set_upper_bound(variable, 4).expect("non-empty domain");
        solver.propagate().expect("no contradiction");

        assert_eq!(Some(false), solver.truth_value(literals[3]));
        assert_eq!(Some(false), solver.truth_value(literals[5]));
        assert_eq!(None, solver.truth_value(literals[4]));
    }

    #[test]
    fn a_true_literal_assigns_the_variable() {
        let mut solver = TestSolver::default();
        let variable = solver.new_variable(0, 3);
        let literals = channel(&mut solver, variable, 4, 0);

        let _ = solver.set_true(literals[2]).expect("unfixed literal");
        solver.propagate().expect("no contradiction");

        assert_eq!(Some(2), solver.fixed_value(variable));
        assert_eq!(Some(false), solver.truth_value(literals[0]));
        assert_eq!(Some(false), solver.truth_value(literals[1]));
        assert_eq!(Some(false), solver.truth_value(literals[3]));
    }

    #[test]
    fn the_last_possible_value_is_chosen() {
        let mut solver = TestSolver::default();
        let variable = solver.new_variable(1, 3);
        let literals = channel(&mut solver, variable, 3, 1);

        let _ = solver.set_false(literals[0]).expect("unfixed literal");
        let _ = solver.set_false(literals[2]).expect("unfixed literal");
        solver.propagate().expect("no contradiction");

        assert_eq!(Some(2), solver.fixed_value(variable));
        assert_eq!(Some(true), solver.truth_value(literals[1]));
        assert_eq!(Entailment::True, solver.is_satisfied());
    }

    #[test]
    fn two_true_literals_are_a_contradiction() {
        let mut solver = TestSolver::default();
        let variable = solver.new_variable(0, 3);
        let literals = channel(&mut solver, variable, 4, 0);

        let _ = solver.set_true(literals[0]).expect("unfixed literal");
        let _ = solver.set_true(literals[1]).expect("unfixed literal");
        assert!(solver.propagate().is_err());
    }

    #[test]
    fn values_without_literals_are_a_contradiction() {
        let mut solver = TestSolver::default();
        let variable = solver.new_variable(5, 8);
        let literals = (0..3).map(|_| solver.new_literal()).collect::<Vec<_>>();

        let result = solver.new_propagator(BoolIntChannelingArgs {
            variable,
            literals: literals.into(),
            offset: 0,
        });
        assert!(result.is_err());
    }
}
