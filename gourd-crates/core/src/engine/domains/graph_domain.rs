use super::EmptyDomain;
use super::EnvelopeKernelDomain;
use crate::basic_types::ModelError;
use crate::engine::notifications::DomainEvent;
use crate::engine::trailed::TrailedBitSet;
use crate::engine::TrailedValues;

/// The largest adjacency matrix a graph variable can have; arcs are encoded as `i32` matrix
/// indices in deltas.
const MAX_MATRIX_SIZE: u64 = 1 << 24;

/// Whether arcs of a graph variable have a direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GraphOrientation {
    #[default]
    Directed,
    /// Arc `(i, j)` and arc `(j, i)` are the same edge; they are always added and removed
    /// together.
    Undirected,
}

/// A graph domain over the vertices `0..num_vertices`, with the envelope and kernel stored as
/// adjacency matrices.
#[derive(Clone, Debug)]
pub(crate) struct GraphDomain {
    num_vertices: usize,
    orientation: GraphOrientation,
    envelope: TrailedBitSet,
    kernel: TrailedBitSet,
}

impl GraphDomain {
    pub(crate) fn new(
        store: &mut TrailedValues,
        num_vertices: usize,
        orientation: GraphOrientation,
        envelope: &[(usize, usize)],
        kernel: &[(usize, usize)],
    ) -> Result<GraphDomain, ModelError> {
        let capacity = num_vertices
            .checked_mul(num_vertices)
            .filter(|&capacity| capacity as u64 <= MAX_MATRIX_SIZE)
            .ok_or(ModelError::DomainTooLarge {
                width: (num_vertices as u64).saturating_mul(num_vertices as u64),
            })?;

        let check_vertices = |&(from, to): &(usize, usize)| {
            match [from, to].into_iter().find(|&vertex| vertex >= num_vertices) {
                Some(vertex) => Err(ModelError::VertexOutOfRange {
                    vertex,
                    num_vertices,
                }),
                None => Ok(()),
            }
        };
        envelope.iter().try_for_each(check_vertices)?;
        kernel.iter().try_for_each(check_vertices)?;

        let matrix_entries = |arcs: &[(usize, usize)]| {
            arcs.iter()
                .flat_map(|&(from, to)| arc_indices(num_vertices, orientation, from, to))
                .collect::<Vec<_>>()
        };
        let envelope = TrailedBitSet::new(store, capacity, matrix_entries(envelope));
        if let Some(&(from, to)) = kernel
            .iter()
            .find(|&&(from, to)| !envelope.contains(store, from * num_vertices + to))
        {
            return Err(ModelError::KernelArcNotInEnvelope(from, to));
        }

        Ok(GraphDomain {
            num_vertices,
            orientation,
            kernel: TrailedBitSet::new(store, capacity, matrix_entries(kernel)),
            envelope,
        })
    }

    pub(crate) fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub(crate) fn orientation(&self) -> GraphOrientation {
        self.orientation
    }

    /// Split an arc encoded by [`EnvelopeKernelDomain::encode`] into its endpoints.
    pub(crate) fn decode(&self, element: i32) -> (usize, usize) {
        let element = element as usize;
        (element / self.num_vertices, element % self.num_vertices)
    }

    pub(crate) fn envelope(&self) -> &TrailedBitSet {
        &self.envelope
    }

    pub(crate) fn kernel(&self) -> &TrailedBitSet {
        &self.kernel
    }

    pub(crate) fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_vertices + to
    }

    /// The matrix entries which make up the arc `(from, to)`.
    fn indices(&self, from: usize, to: usize) -> impl Iterator<Item = usize> {
        arc_indices(self.num_vertices, self.orientation, from, to)
    }
}

/// The row-major matrix entries of the arc `(from, to)`; undirected arcs also cover `(to, from)`.
fn arc_indices(
    num_vertices: usize,
    orientation: GraphOrientation,
    from: usize,
    to: usize,
) -> impl Iterator<Item = usize> {
    let mirrored = (orientation == GraphOrientation::Undirected && from != to)
        .then_some(to * num_vertices + from);
    std::iter::once(from * num_vertices + to).chain(mirrored)
}

impl EnvelopeKernelDomain for GraphDomain {
    type Element = (usize, usize);

    const ENFORCE_EVENT: DomainEvent = DomainEvent::ArcEnforce;
    const EXCLUDE_EVENT: DomainEvent = DomainEvent::ArcRemove;

    fn envelope_size(&self, store: &TrailedValues) -> usize {
        self.envelope.len(store)
    }

    fn kernel_size(&self, store: &TrailedValues) -> usize {
        self.kernel.len(store)
    }

    fn in_envelope(&self, store: &TrailedValues, (from, to): (usize, usize)) -> bool {
        from < self.num_vertices
            && to < self.num_vertices
            && self.envelope.contains(store, self.index(from, to))
    }

    fn in_kernel(&self, store: &TrailedValues, (from, to): (usize, usize)) -> bool {
        from < self.num_vertices
            && to < self.num_vertices
            && self.kernel.contains(store, self.index(from, to))
    }

    fn enforce(&self, store: &mut TrailedValues, arc: (usize, usize)) -> Result<bool, EmptyDomain> {
        if !self.in_envelope(store, arc) {
            return Err(EmptyDomain);
        }

        let mut changed = false;
        for index in self.indices(arc.0, arc.1) {
            changed |= self.kernel.insert(store, index);
        }
        Ok(changed)
    }

    fn exclude(&self, store: &mut TrailedValues, arc: (usize, usize)) -> Result<bool, EmptyDomain> {
        if self.in_kernel(store, arc) {
            return Err(EmptyDomain);
        }
        if !self.in_envelope(store, arc) {
            return Ok(false);
        }

        for index in self.indices(arc.0, arc.1) {
            let _ = self.envelope.remove(store, index);
        }
        Ok(true)
    }

    fn encode(&self, (from, to): (usize, usize)) -> i32 {
        self.index(from, to) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_graph(
        store: &mut TrailedValues,
        num_vertices: usize,
        orientation: GraphOrientation,
    ) -> GraphDomain {
        let arcs = (0..num_vertices)
            .flat_map(|from| (0..num_vertices).map(move |to| (from, to)))
            .collect::<Vec<_>>();
        GraphDomain::new(store, num_vertices, orientation, &arcs, &[]).expect("valid domain")
    }

    #[test]
    fn vertices_must_exist() {
        let mut store = TrailedValues::default();

        let result = GraphDomain::new(&mut store, 2, GraphOrientation::Directed, &[(0, 2)], &[]);

        assert_eq!(
            Some(ModelError::VertexOutOfRange {
                vertex: 2,
                num_vertices: 2
            }),
            result.err()
        );
    }

    #[test]
    fn undirected_arcs_are_updated_together() {
        let mut store = TrailedValues::default();
        let domain = complete_graph(&mut store, 3, GraphOrientation::Undirected);

        assert_eq!(Ok(true), domain.enforce(&mut store, (0, 2)));
        assert!(domain.in_kernel(&store, (2, 0)));

        assert_eq!(Ok(true), domain.exclude(&mut store, (1, 0)));
        assert!(!domain.in_envelope(&store, (0, 1)));
    }

    #[test]
    fn directed_arcs_are_independent() {
        let mut store = TrailedValues::default();
        let domain = complete_graph(&mut store, 3, GraphOrientation::Directed);

        assert_eq!(Ok(true), domain.exclude(&mut store, (1, 0)));

        assert!(domain.in_envelope(&store, (0, 1)));
    }

    #[test]
    fn conflicting_arc_updates_fail() {
        let mut store = TrailedValues::default();
        let domain = GraphDomain::new(
            &mut store,
            2,
            GraphOrientation::Directed,
            &[(0, 1), (1, 0)],
            &[(0, 1)],
        )
        .expect("valid domain");

        assert_eq!(Err(EmptyDomain), domain.exclude(&mut store, (0, 1)));
        assert_eq!(Err(EmptyDomain), domain.enforce(&mut store, (1, 1)));
    }

    #[test]
    fn oversized_graphs_are_rejected() {
        let mut store = TrailedValues::default();

        let result = GraphDomain::new(&mut store, 46_341, GraphOrientation::Directed, &[], &[]);
        assert_eq!(
            Some(ModelError::DomainTooLarge {
                width: 46_341 * 46_341
            }),
            result.err()
        );

        let result = GraphDomain::new(&mut store, usize::MAX, GraphOrientation::Directed, &[], &[]);
        assert!(matches!(result, Err(ModelError::DomainTooLarge { .. })));

        assert!(GraphDomain::new(&mut store, 4096, GraphOrientation::Directed, &[], &[]).is_ok());
    }

    #[test]
    fn kernel_arcs_must_be_in_the_envelope() {
        let mut store = TrailedValues::default();

        let result = GraphDomain::new(
            &mut store,
            3,
            GraphOrientation::Undirected,
            &[(0, 1)],
            &[(1, 0), (2, 1)],
        );

        assert_eq!(Some(ModelError::KernelArcNotInEnvelope(2, 1)), result.err());
    }

    #[test]
    fn arcs_are_encoded_row_major() {
        let mut store = TrailedValues::default();
        let domain = complete_graph(&mut store, 4, GraphOrientation::Directed);

        let element = domain.encode((2, 3));

        assert_eq!(11, element);
        assert_eq!((2, 3), domain.decode(element));
    }
}
