use super::Assignments;
use super::EnvelopeKernelDomain;
use super::GraphOrientation;
use super::IntegerRepresentation;
use crate::engine::trailed::TrailedBitSet;
use crate::engine::variables::DomainId;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::SetVariable;
use crate::engine::variables::Variable;
use crate::engine::TrailedValues;

/// A read-only view on the current domains.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) store: &'a TrailedValues,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments, store: &'a TrailedValues) -> Self {
        Domains { assignments, store }
    }
}

impl ReadDomains for Domains<'_> {
    fn domains(&self) -> Domains<'_> {
        *self
    }
}

/// Queries on the current domains, available wherever the domains can be inspected.
pub trait ReadDomains {
    fn domains(&self) -> Domains<'_>;

    fn lower_bound(&self, variable: DomainId) -> i32 {
        let Domains { assignments, store } = self.domains();
        assignments.integer(variable).lower_bound(store)
    }

    fn upper_bound(&self, variable: DomainId) -> i32 {
        let Domains { assignments, store } = self.domains();
        assignments.integer(variable).upper_bound(store)
    }

    fn contains(&self, variable: DomainId, value: i32) -> bool {
        let Domains { assignments, store } = self.domains();
        assignments.integer(variable).contains(store, value)
    }

    fn domain_size(&self, variable: DomainId) -> usize {
        let Domains { assignments, store } = self.domains();
        assignments.integer(variable).size(store)
    }

    /// The value of `variable` if its domain is a singleton.
    fn fixed_value(&self, variable: DomainId) -> Option<i32> {
        let lower_bound = self.lower_bound(variable);
        (lower_bound == self.upper_bound(variable)).then_some(lower_bound)
    }

    /// The values in the domain of `variable`, in increasing order.
    fn iterate_domain(&self, variable: DomainId) -> impl Iterator<Item = i32> + '_ {
        let Domains { assignments, store } = self.domains();
        assignments.integer(variable).iter(store)
    }

    fn representation(&self, variable: DomainId) -> IntegerRepresentation {
        self.domains().assignments.integer(variable).representation()
    }

    fn truth_value(&self, literal: Literal) -> Option<bool> {
        self.fixed_value(literal.domain_id()).map(|value| value == 1)
    }

    fn envelope_contains(&self, set: SetVariable, value: i32) -> bool {
        let Domains { assignments, store } = self.domains();
        assignments.set(set).envelope_contains(store, value)
    }

    fn kernel_contains(&self, set: SetVariable, value: i32) -> bool {
        let Domains { assignments, store } = self.domains();
        assignments.set(set).kernel_contains(store, value)
    }

    fn envelope_size(&self, set: SetVariable) -> usize {
        let Domains { assignments, store } = self.domains();
        assignments.set(set).envelope_size(store)
    }

    fn kernel_size(&self, set: SetVariable) -> usize {
        let Domains { assignments, store } = self.domains();
        assignments.set(set).kernel_size(store)
    }

    /// The values which may be in `set`, in increasing order.
    fn envelope_values(&self, set: SetVariable) -> impl Iterator<Item = i32> + '_ {
        let Domains { assignments, store } = self.domains();
        assignments.set(set).envelope_values(store)
    }

    /// The values which are certainly in `set`, in increasing order.
    fn kernel_values(&self, set: SetVariable) -> impl Iterator<Item = i32> + '_ {
        let Domains { assignments, store } = self.domains();
        assignments.set(set).kernel_values(store)
    }

    /// The arcs which may be in `graph`.
    fn envelope_graph(&self, graph: GraphVariable) -> GraphView<'_> {
        let Domains { assignments, store } = self.domains();
        let domain = assignments.graph(graph);
        GraphView {
            arcs: domain.envelope(),
            num_vertices: domain.num_vertices(),
            store,
        }
    }

    /// The arcs which are certainly in `graph`.
    fn kernel_graph(&self, graph: GraphVariable) -> GraphView<'_> {
        let Domains { assignments, store } = self.domains();
        let domain = assignments.graph(graph);
        GraphView {
            arcs: domain.kernel(),
            num_vertices: domain.num_vertices(),
            store,
        }
    }

    fn num_vertices(&self, graph: GraphVariable) -> usize {
        self.domains().assignments.graph(graph).num_vertices()
    }

    fn orientation(&self, graph: GraphVariable) -> GraphOrientation {
        self.domains().assignments.graph(graph).orientation()
    }

    /// Whether the domain of `variable` holds exactly one value, whatever its kind.
    fn is_instantiated(&self, variable: impl Variable) -> bool {
        let Domains { assignments, store } = self.domains();
        assignments.is_instantiated(store, variable.variable_id())
    }
}

/// One side (kernel or envelope) of a graph domain, viewed as a graph.
#[derive(Clone, Copy, Debug)]
pub struct GraphView<'a> {
    arcs: &'a TrailedBitSet,
    num_vertices: usize,
    store: &'a TrailedValues,
}

impl<'a> GraphView<'a> {
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// The number of arcs; an undirected edge between two distinct vertices counts twice.
    pub fn num_arcs(&self) -> usize {
        self.arcs.len(self.store)
    }

    pub fn arc_exists(&self, from: usize, to: usize) -> bool {
        from < self.num_vertices
            && to < self.num_vertices
            && self.arcs.contains(self.store, from * self.num_vertices + to)
    }

    pub fn successors(&self, from: usize) -> impl Iterator<Item = usize> + 'a {
        let GraphView {
            arcs,
            num_vertices,
            store,
        } = *self;
        let row_start = from * num_vertices;
        let row_end = row_start + num_vertices;

        let mut next = arcs.next_set_bit(store, row_start);
        std::iter::from_fn(move || {
            let index = next.filter(|&index| index < row_end)?;
            next = arcs.next_set_bit(store, index + 1);
            Some(index - row_start)
        })
    }

    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        let GraphView {
            arcs,
            num_vertices,
            store,
        } = *self;
        arcs.iter(store)
            .map(move |index| (index / num_vertices, index % num_vertices))
    }
}
