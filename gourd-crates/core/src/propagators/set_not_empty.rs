use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::SetVariable;
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

#[derive(Clone, Copy, Debug)]
pub(crate) struct SetNotEmptyArgs {
    pub(crate) set: SetVariable,
}

impl PropagatorConstructor for SetNotEmptyArgs {
    type PropagatorImpl = SetNotEmptyPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.set, LocalId::from(0));
        SetNotEmptyPropagator { set: self.set }
    }
}

/// Propagator for `set != {}`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SetNotEmptyPropagator {
    set: SetVariable,
}

impl Propagator for SetNotEmptyPropagator {
    fn name(&self) -> &str {
        "SetNotEmpty"
    }

    fn priority(&self) -> Priority {
        Priority::Unary
    }

    fn propagation_conditions(&self, _local_id: LocalId) -> DomainEvents {
        DomainEvents::SET_REMOVE
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        if context.kernel_size(self.set) > 0 {
            return Ok(());
        }

        let first_two = {
            let mut envelope = context.envelope_values(self.set);
            (envelope.next(), envelope.next())
        };
        match first_two {
            (None, _) => Err(context.conflict("the set must not be empty")),
            (Some(value), None) => {
                let _ = context.enforce_element(self.set, value)?;
                Ok(())
            }
            (Some(_), Some(_)) => Ok(()),
        }
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        if domains.kernel_size(self.set) > 0 {
            Entailment::True
        } else if domains.envelope_size(self.set) == 0 {
            Entailment::False
        } else {
            Entailment::Undefined
        }
    }
}
