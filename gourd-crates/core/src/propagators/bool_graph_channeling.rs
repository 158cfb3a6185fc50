use enumset::EnumSet;

use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::Literal;
use crate::engine::GraphOrientation;
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
pub(crate) struct BoolGraphChannelingArgs {
    pub(crate) graph: GraphVariable,
    /// The `n * n` matrix of relations in row-major order, where `n` is the number of vertices
    /// of `graph`.
    pub(crate) relations: Box<[Literal]>,
}

impl PropagatorConstructor for BoolGraphChannelingArgs {
    type PropagatorImpl = BoolGraphChannelingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let BoolGraphChannelingArgs { graph, relations } = self;

        let num_vertices = context.num_vertices(graph);
        let orientation = context.orientation(graph);

        for (index, relation) in relations.iter().enumerate() {
            context.register(*relation, LocalId::from(index as u32));
        }
        context.register(graph, LocalId::from(relations.len() as u32));

        BoolGraphChannelingPropagator {
            graph,
            relations,
            num_vertices,
            orientation,
        }
    }
}

/// Propagator for `relations[i][j] <-> (i, j) in graph`.
///
/// A relation which is true forces its arc into the kernel of the graph, one which is false
/// removes it from the envelope, and vice versa. For an undirected graph `relations[i][j]` and
/// `relations[j][i]` both refer to the same edge.
#[derive(Clone, Debug)]
pub(crate) struct BoolGraphChannelingPropagator {
    graph: GraphVariable,
    relations: Box<[Literal]>,
    num_vertices: usize,
    orientation: GraphOrientation,
}

impl BoolGraphChannelingPropagator {
    fn graph_id(&self) -> LocalId {
        LocalId::from(self.relations.len() as u32)
    }

    fn relation(&self, from: usize, to: usize) -> Literal {
        self.relations[from * self.num_vertices + to]
    }

    /// Set the relations of the arc `(from, to)`.
    fn set_relation(
        &self,
        context: &mut PropagationContext,
        from: usize,
        to: usize,
        truth_value: bool,
    ) -> PropagationStatus {
        let _ = context.set_literal(self.relation(from, to), truth_value)?;
        if self.orientation == GraphOrientation::Undirected {
            let _ = context.set_literal(self.relation(to, from), truth_value)?;
        }
        Ok(())
    }

    /// Push the value of a fixed relation into the graph.
    fn set_arc(
        &self,
        context: &mut PropagationContext,
        from: usize,
        to: usize,
        truth_value: bool,
    ) -> PropagationStatus {
        if truth_value {
            let _ = context.enforce_arc(self.graph, from, to)?;
        } else {
            let _ = context.remove_arc(self.graph, from, to)?;
        }
        Ok(())
    }

    fn arcs(&self) -> impl Iterator<Item = (usize, usize)> {
        let num_vertices = self.num_vertices;
        (0..num_vertices).flat_map(move |from| (0..num_vertices).map(move |to| (from, to)))
    }
}

impl Propagator for BoolGraphChannelingPropagator {
    fn name(&self) -> &str {
        "BoolGraphChanneling"
    }

    fn priority(&self) -> Priority {
        Priority::Linear
    }

    fn is_fine_grained(&self) -> bool {
        true
    }

    fn propagation_conditions(&self, local_id: LocalId) -> DomainEvents {
        if local_id == self.graph_id() {
            DomainEvents::ANY_GRAPH
        } else {
            DomainEvents::ASSIGN
        }
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        // All fixed relations are pushed first, so that the relations tightened afterwards can
        // read the final graph.
        for (from, to) in self.arcs() {
            if let Some(truth_value) = context.truth_value(self.relation(from, to)) {
                self.set_arc(&mut context, from, to, truth_value)?;
            }
        }

        for (from, to) in self.arcs() {
            let relation = self.relation(from, to);
            if context.truth_value(relation).is_some() {
                continue;
            }

            if !context.envelope_graph(self.graph).arc_exists(from, to) {
                let _ = context.set_false(relation)?;
            } else if context.kernel_graph(self.graph).arc_exists(from, to) {
                let _ = context.set_true(relation)?;
            }
        }

        Ok(())
    }

    fn propagate_on_event(
        &mut self,
        mut context: PropagationContext,
        local_id: LocalId,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        if local_id == self.graph_id() {
            context.for_each_enforced_arc(self.graph, local_id, |context, from, to| {
                self.set_relation(context, from, to, true)
            })?;
            return context.for_each_removed_arc(self.graph, local_id, |context, from, to| {
                self.set_relation(context, from, to, false)
            });
        }

        let index = local_id.unpack() as usize;
        let (from, to) = (index / self.num_vertices, index % self.num_vertices);
        let Some(truth_value) = context.truth_value(self.relations[index]) else {
            return Ok(());
        };

        self.set_arc(&mut context, from, to, truth_value)?;
        if self.orientation == GraphOrientation::Undirected {
            // The propagator does not hear about its own change to the edge.
            let _ = context.set_literal(self.relation(to, from), truth_value)?;
        }
        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let envelope = domains.envelope_graph(self.graph);
        let kernel = domains.kernel_graph(self.graph);

        let violated = self.arcs().any(|(from, to)| {
            match domains.truth_value(self.relation(from, to)) {
                Some(true) => !envelope.arc_exists(from, to),
                Some(false) => kernel.arc_exists(from, to),
                None => false,
            }
        });
        if violated {
            return Entailment::False;
        }

        let decided = self.arcs().all(|(from, to)| {
            match domains.truth_value(self.relation(from, to)) {
                Some(true) => kernel.arc_exists(from, to),
                Some(false) => !envelope.arc_exists(from, to),
                None => false,
            }
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

    fn all_arcs(num_vertices: usize) -> Vec<(usize, usize)> {
        (0..num_vertices)
            .flat_map(|from| (0..num_vertices).map(move |to| (from, to)))
            .collect()
    }

    fn channel(
        solver: &mut TestSolver,
        num_vertices: usize,
        orientation: GraphOrientation,
        envelope: &[(usize, usize)],
        kernel: &[(usize, usize)],
    ) -> (GraphVariable, Vec<Literal>) {
        let graph = solver.new_graph(num_vertices, orientation, envelope, kernel);
        let relations = (0..num_vertices * num_vertices)
            .map(|_| solver.new_literal())
            .collect::<Vec<_>>();
        let _ = solver
            .new_propagator(BoolGraphChannelingArgs {
                graph,
                relations: relations.clone().into(),
            })
            .expect("no empty domains");

        (graph, relations)
    }

    #[test]
    fn graph_is_pushed_into_relations_at_initialise() {
        let mut solver = TestSolver::default();
        let (_, relations) = channel(
            &mut solver,
            2,
            GraphOrientation::Directed,
            &[(0, 1), (1, 0)],
            &[(0, 1)],
        );

        assert_eq!(Some(false), solver.truth_value(relations[0]));
        assert_eq!(Some(true), solver.truth_value(relations[1]));
        assert_eq!(None, solver.truth_value(relations[2]));
        assert_eq!(Some(false), solver.truth_value(relations[3]));
    }

    #[test]
    fn fixed_relations_update_the_graph() {
        let mut solver = TestSolver::default();
        let (graph, relations) =
            channel(&mut solver, 2, GraphOrientation::Directed, &all_arcs(2), &[]);

        let _ = solver.set_true(relations[1]).expect("unfixed relation");
        let _ = solver.set_false(relations[2]).expect("unfixed relation");
        solver.propagate().expect("no contradiction");

        assert!(solver.kernel_graph(graph).arc_exists(0, 1));
        assert!(!solver.envelope_graph(graph).arc_exists(1, 0));
        assert!(solver.envelope_graph(graph).arc_exists(0, 0));
    }

    #[test]
    fn directed_arcs_only_fix_their_own_relation() {
        let mut solver = TestSolver::default();
        let (graph, relations) =
            channel(&mut solver, 3, GraphOrientation::Directed, &all_arcs(3), &[]);

        let _ = solver.enforce_arc(graph, 0, 2).expect("arc in envelope");
        let _ = solver.remove_arc(graph, 1, 2).expect("arc not in kernel");
        solver.propagate().expect("no contradiction");

        assert_eq!(Some(true), solver.truth_value(relations[2]));
        assert_eq!(None, solver.truth_value(relations[6]));
        assert_eq!(Some(false), solver.truth_value(relations[5]));
        assert_eq!(None, solver.truth_value(relations[7]));
    }

    #[test]
    fn undirected_edges_fix_both_relations() {
        let mut solver = TestSolver::default();
        let (graph, relations) =
            channel(&mut solver, 3, GraphOrientation::Undirected, &all_arcs(3), &[]);

        let _ = solver.enforce_arc(graph, 0, 2).expect("edge in envelope");
        let _ = solver.remove_arc(graph, 2, 1).expect("edge not in kernel");
        solver.propagate().expect("no contradiction");

        assert_eq!(Some(true), solver.truth_value(relations[2]));
        assert_eq!(Some(true), solver.truth_value(relations[6]));
        assert_eq!(Some(false), solver.truth_value(relations[5]));
        assert_eq!(Some(false), solver.truth_value(relations[7]));
    }

    #[test]
    fn undirected_relations_are_kept_symmetric() {
        let mut solver = TestSolver::default();
        let (graph, relations) =
            channel(&mut solver, 3, GraphOrientation::Undirected, &all_arcs(3), &[]);

        let _ = solver.set_true(relations[1]).expect("unfixed relation");
        let _ = solver.set_false(relations[5]).expect("unfixed relation");
        solver.propagate().expect("no contradiction");

        assert_eq!(Some(true), solver.truth_value(relations[3]));
        assert_eq!(Some(false), solver.truth_value(relations[7]));
        assert!(solver.kernel_graph(graph).arc_exists(1, 0));
        assert!(!solver.envelope_graph(graph).arc_exists(2, 1));
    }

    #[test]
    fn relation_outside_the_envelope_cannot_be_true() {
        let mut solver = TestSolver::default();
        let graph = solver.new_graph(2, GraphOrientation::Directed, &[(0, 1)], &[]);
        let relations = (0..4).map(|_| solver.new_literal()).collect::<Vec<_>>();
        let _ = solver.set_true(relations[2]).expect("unfixed relation");

        let result = solver.new_propagator(BoolGraphChannelingArgs {
            graph,
            relations: relations.into(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn entailment_follows_the_relations() {
        let mut solver = TestSolver::default();
        let graph = solver.new_graph(1, GraphOrientation::Directed, &[(0, 0)], &[]);
        let relation = solver.new_literal();
        let propagator = BoolGraphChannelingPropagator {
            graph,
            relations: vec![relation].into(),
            num_vertices: 1,
            orientation: GraphOrientation::Directed,
        };
        assert_eq!(Entailment::Undefined, propagator.is_entailed(solver.domains()));

        let _ = solver.enforce_arc(graph, 0, 0).expect("arc in envelope");
        assert_eq!(Entailment::Undefined, propagator.is_entailed(solver.domains()));

        let _ = solver.set_false(relation).expect("unfixed relation");
        assert_eq!(Entailment::False, propagator.is_entailed(solver.domains()));
    }

    #[test]
    fn fully_decided_channeling_is_entailed() {
        let mut solver = TestSolver::default();
        let (_, relations) = channel(
            &mut solver,
            2,
            GraphOrientation::Directed,
            &[(0, 1), (1, 1)],
            &[(1, 1)],
        );
        let _ = solver.set_true(relations[1]).expect("unfixed relation");
        solver.propagate().expect("no contradiction");

        assert_eq!(Entailment::True, solver.is_satisfied());
    }
}
