use super::EnvelopeKernelDomain;
use super::GraphDomain;
use super::GraphOrientation;
use super::IntegerDomain;
use super::IntegerRepresentation;
use super::SetDomain;
use crate::basic_types::ModelError;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::SetVariable;
use crate::engine::variables::VariableId;
use crate::engine::TrailedValues;

#[derive(Clone, Debug)]
pub(crate) enum Domain {
    Integer(IntegerDomain),
    Set(SetDomain),
    Graph(GraphDomain),
}

/// The domains of all variables, indexed by [`VariableId`].
///
/// Typed handles guarantee that a [`DomainId`] always refers to an integer domain, a
/// [`SetVariable`] to a set domain, and so on.
#[derive(Clone, Debug, Default)]
pub struct Assignments {
    domains: KeyedVec<VariableId, Domain>,
}

impl Assignments {
    pub(crate) fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn new_integer_variable(
        &mut self,
        store: &mut TrailedValues,
        lower_bound: i32,
        upper_bound: i32,
        representation: IntegerRepresentation,
    ) -> Result<DomainId, ModelError> {
        let domain = IntegerDomain::new(store, lower_bound, upper_bound, representation)?;
        Ok(DomainId::new(self.domains.push(Domain::Integer(domain))))
    }

    pub(crate) fn new_set_variable(
        &mut self,
        store: &mut TrailedValues,
        envelope: &[i32],
        kernel: &[i32],
    ) -> Result<SetVariable, ModelError> {
        let domain = SetDomain::new(store, envelope, kernel)?;
        Ok(SetVariable {
            id: self.domains.push(Domain::Set(domain)),
        })
    }

    pub(crate) fn new_graph_variable(
        &mut self,
        store: &mut TrailedValues,
        num_vertices: usize,
        orientation: GraphOrientation,
        envelope: &[(usize, usize)],
        kernel: &[(usize, usize)],
    ) -> Result<GraphVariable, ModelError> {
        let domain = GraphDomain::new(store, num_vertices, orientation, envelope, kernel)?;
        Ok(GraphVariable {
            id: self.domains.push(Domain::Graph(domain)),
        })
    }

    pub(crate) fn integer(&self, variable: DomainId) -> &IntegerDomain {
        match &self.domains[variable.id] {
            Domain::Integer(domain) => domain,
            _ => unreachable!("{variable} is not an integer variable"),
        }
    }

    pub(crate) fn set(&self, variable: SetVariable) -> &SetDomain {
        match &self.domains[variable.id] {
            Domain::Set(domain) => domain,
            _ => unreachable!("{} is not a set variable", variable.id),
        }
    }

    pub(crate) fn graph(&self, variable: GraphVariable) -> &GraphDomain {
        match &self.domains[variable.id] {
            Domain::Graph(domain) => domain,
            _ => unreachable!("{} is not a graph variable", variable.id),
        }
    }

    pub(crate) fn is_instantiated(&self, store: &TrailedValues, variable: VariableId) -> bool {
        match &self.domains[variable] {
            Domain::Integer(domain) => domain.is_fixed(store),
            Domain::Set(domain) => domain.is_fixed(store),
            Domain::Graph(domain) => domain.is_fixed(store),
        }
    }
}
