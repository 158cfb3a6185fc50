use log::warn;

use super::Constraint;
use crate::basic_types::ModelError;
use crate::engine::variables::DomainId;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::Variable;
use crate::engine::IntegerRepresentation;
use crate::engine::State;
use crate::propagation::ReadDomains;
use crate::propagators::BoolGraphChannelingArgs;
use crate::propagators::BoolIntChannelingArgs;

/// Creates the [`Constraint`] `relations[i][j] <-> (i, j) in graph`.
///
/// The relations form a square matrix with one row and one column per vertex of `graph`. For an
/// undirected graph, `relations[i][j]` and `relations[j][i]` are both equivalent to the edge
/// between `i` and `j`.
pub fn bool_graph_channeling(graph: GraphVariable, relations: Vec<Vec<Literal>>) -> impl Constraint {
    BoolGraphChanneling { graph, relations }
}

/// Creates the [`Constraint`] `literals[i] <-> (variable = offset + i)`.
///
/// The domain of `variable` must be [`IntegerRepresentation::Enumerated`], so that a removed
/// value can be observed.
pub fn bool_int_channeling(
    variable: DomainId,
    literals: impl Into<Box<[Literal]>>,
    offset: i32,
) -> impl Constraint {
    BoolIntChanneling {
        variable,
        literals: literals.into(),
        offset,
    }
}

struct BoolGraphChanneling {
    graph: GraphVariable,
    relations: Vec<Vec<Literal>>,
}

impl Constraint for BoolGraphChanneling {
    fn post(self, state: &mut State) -> Result<(), ModelError> {
        let num_vertices = state.num_vertices(self.graph);

        if self.relations.len() != num_vertices {
            return Err(ModelError::ScopeMismatch {
                expected: num_vertices,
                actual: self.relations.len(),
            });
        }
        if let Some(row) = self.relations.iter().find(|row| row.len() != num_vertices) {
            return Err(ModelError::ScopeMismatch {
                expected: num_vertices,
                actual: row.len(),
            });
        }
        if num_vertices == 0 {
            warn!(
                "channeling the empty graph {} to booleans",
                self.graph.variable_id()
            );
        }

        let _ = state.add_propagator(BoolGraphChannelingArgs {
            graph: self.graph,
            relations: self.relations.into_iter().flatten().collect(),
        });
        Ok(())
    }
}

struct BoolIntChanneling {
    variable: DomainId,
    literals: Box<[Literal]>,
    offset: i32,
}

impl Constraint for BoolIntChanneling {
    fn post(self, state: &mut State) -> Result<(), ModelError> {
        if state.representation(self.variable) == IntegerRepresentation::Bounds {
            return Err(ModelError::EnumeratedDomainRequired(
                self.variable.variable_id(),
            ));
        }
        let num_literals = self.literals.len();
        let last_value = i32::try_from(num_literals)
            .ok()
            .and_then(|num_literals| self.offset.checked_add(num_literals))
            .and_then(|end| end.checked_sub(1));
        if last_value.is_none() {
            return Err(ModelError::ChannelingRangeOverflow {
                offset: self.offset,
                num_literals,
            });
        }

        let _ = state.add_propagator(BoolIntChannelingArgs {
            variable: self.variable,
            literals: self.literals,
            offset: self.offset,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GraphOrientation;

    #[test]
    fn relations_must_be_square() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(2, GraphOrientation::Directed, &[(0, 1)], &[], None)
            .expect("valid graph");
        let literals = (0..3)
            .map(|_| state.new_literal(None).expect("unnamed"))
            .collect::<Vec<_>>();

        let result = bool_graph_channeling(
            graph,
            vec![literals[0..2].to_vec(), literals[2..3].to_vec()],
        )
        .post(&mut state);

        assert_eq!(
            Err(ModelError::ScopeMismatch {
                expected: 2,
                actual: 1
            }),
            result
        );
        assert_eq!(0, state.num_propagators());
    }

    #[test]
    fn relations_need_a_row_per_vertex() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(3, GraphOrientation::Undirected, &[], &[], None)
            .expect("valid graph");

        let result = bool_graph_channeling(graph, vec![]).post(&mut state);

        assert_eq!(
            Err(ModelError::ScopeMismatch {
                expected: 3,
                actual: 0
            }),
            result
        );
    }

    #[test]
    fn graph_channeling_is_posted() {
        let mut state = State::default();
        let graph = state
            .new_graph_variable(2, GraphOrientation::Directed, &[(0, 1), (1, 0)], &[(0, 1)], None)
            .expect("valid graph");
        let relations = (0..2)
            .map(|_| {
                (0..2)
                    .map(|_| state.new_literal(None).expect("unnamed"))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        bool_graph_channeling(graph, relations.clone())
            .post(&mut state)
            .expect("square matrix");
        let _ = state.propagate_to_fixed_point().expect("no contradiction");

        assert_eq!(Some(true), state.truth_value(relations[0][1]));
        assert_eq!(Some(false), state.truth_value(relations[0][0]));
        assert_eq!(None, state.truth_value(relations[1][0]));
    }

    #[test]
    fn bounded_variables_cannot_be_channeled() {
        let mut state = State::default();
        let variable = state
            .new_integer_variable_with(0, 3, IntegerRepresentation::Bounds, None)
            .expect("valid bounds");
        let literals = (0..4)
            .map(|_| state.new_literal(None).expect("unnamed"))
            .collect::<Vec<_>>();

        let result = bool_int_channeling(variable, literals, 0).post(&mut state);

        assert_eq!(
            Err(ModelError::EnumeratedDomainRequired(variable.variable_id())),
            result
        );
    }

    #[test]
    fn channeled_values_must_fit_in_i32() {
        let mut state = State::default();
        let variable = state
            .new_integer_variable(i32::MAX - 2, i32::MAX, None)
            .expect("valid bounds");
        let literals = (0..4)
            .map(|_| state.new_literal(None).expect("unnamed"))
            .collect::<Vec<_>>();

        let result =
            bool_int_channeling(variable, literals.clone(), i32::MAX - 2).post(&mut state);
        assert_eq!(
            Err(ModelError::ChannelingRangeOverflow {
                offset: i32::MAX - 2,
                num_literals: 4
            }),
            result
        );
        assert_eq!(0, state.num_propagators());

        bool_int_channeling(variable, &literals[..3], i32::MAX - 2)
            .post(&mut state)
            .expect("last value is i32::MAX");
        let _ = state.propagate_to_fixed_point().expect("no contradiction");
        assert_eq!(i32::MAX, state.upper_bound(variable));
    }

    #[test]
    fn int_channeling_is_posted() {
        let mut state = State::default();
        let variable = state.new_integer_variable(0, 3, None).expect("valid bounds");
        let literals = (0..3)
            .map(|_| state.new_literal(None).expect("unnamed"))
            .collect::<Vec<_>>();

        bool_int_channeling(variable, literals.clone(), 1)
            .post(&mut state)
            .expect("enumerated domain");
        let _ = state.propagate_to_fixed_point().expect("no contradiction");

        assert_eq!(1, state.lower_bound(variable));
        assert_eq!(3, state.upper_bound(variable));
    }
}
