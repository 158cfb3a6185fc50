use enumset::EnumSet;

use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::create_statistics_struct;
use crate::engine::variables::DomainId;
use crate::engine::variables::SetVariable;
use crate::engine::TrailedInteger;
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
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

const SET_ID: LocalId = LocalId::from(0);
const SUM_ID: LocalId = LocalId::from(1);

#[derive(Clone, Copy, Debug)]
pub(crate) struct SetSumArgs {
    pub(crate) set: SetVariable,
    pub(crate) sum: DomainId,
    pub(crate) not_empty: bool,
}

impl PropagatorConstructor for SetSumArgs {
    type PropagatorImpl = SetSumPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let SetSumArgs {
            set,
            sum,
            not_empty,
        } = self;

        context.register(set, SET_ID);
        context.register(sum, SUM_ID);

        let sums = Sums::of(&context, set);
        SetSumPropagator {
            set,
            sum,
            not_empty,
            kernel_sum: context.new_trailed_integer(sums.kernel),
            positive_sum: context.new_trailed_integer(sums.positive),
            negative_sum: context.new_trailed_integer(sums.negative),
            statistics: SetSumStatistics::default(),
        }
    }
}

create_statistics_struct!(SetSumStatistics {
    num_enforced: usize,
    num_removed: usize,
});

/// Propagator for `sum = sum(set)`, optionally with `set` non-empty.
///
/// The sum of the kernel and the sums of the positive and of the negative values which are in
/// the envelope but not in the kernel are kept incrementally. From these, the bounds of `sum`
/// are derived, and values of the envelope are enforced or removed when leaving them out or
/// taking them in would move the sum outside its bounds.
#[derive(Clone, Debug)]
pub(crate) struct SetSumPropagator {
    set: SetVariable,
    sum: DomainId,
    not_empty: bool,
    kernel_sum: TrailedInteger,
    /// The sum of the positive values in the envelope but not in the kernel.
    positive_sum: TrailedInteger,
    /// The sum of the negative values in the envelope but not in the kernel.
    negative_sum: TrailedInteger,
    statistics: SetSumStatistics,
}

/// The sums maintained by [`SetSumPropagator`], computed from scratch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Sums {
    kernel: i64,
    positive: i64,
    negative: i64,
}

impl Sums {
    fn of(domains: &impl ReadDomains, set: SetVariable) -> Sums {
        let mut sums = Sums {
            kernel: 0,
            positive: 0,
            negative: 0,
        };

        for value in domains.envelope_values(set) {
            let value = value as i64;
            if domains.kernel_contains(set, value as i32) {
                sums.kernel += value;
            } else if value > 0 {
                sums.positive += value;
            } else {
                sums.negative += value;
            }
        }
        sums
    }
}

impl SetSumPropagator {
    fn uncommitted_sum(&self, value: i32) -> TrailedInteger {
        if value > 0 {
            self.positive_sum
        } else {
            self.negative_sum
        }
    }

    /// Account for the changes to the set made by others since the previous activation.
    fn consume_set_changes(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        context.for_each_enforced_element(SET_ID, |context, value| {
            context.add_assign_trailed(self.kernel_sum, value as i64);
            context.add_assign_trailed(self.uncommitted_sum(value), -(value as i64));
            Ok(())
        })?;
        context.for_each_removed_element(SET_ID, |context, value| {
            context.add_assign_trailed(self.uncommitted_sum(value), -(value as i64));
            Ok(())
        })
    }

    fn enforce(&mut self, context: &mut PropagationContext, value: i32) -> PropagationStatus {
        let _ = context.enforce_element(self.set, value)?;
        context.add_assign_trailed(self.kernel_sum, value as i64);
        context.add_assign_trailed(self.uncommitted_sum(value), -(value as i64));
        self.statistics.num_enforced += 1;
        Ok(())
    }

    fn remove(&mut self, context: &mut PropagationContext, value: i32) -> PropagationStatus {
        let _ = context.remove_element(self.set, value)?;
        context.add_assign_trailed(self.uncommitted_sum(value), -(value as i64));
        self.statistics.num_removed += 1;
        Ok(())
    }

    /// Filter until neither the sum nor the set changes.
    fn filter(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        loop {
            if self.not_empty && context.envelope_size(self.set) == 0 {
                return Err(context.conflict("the set must not be empty"));
            }

            let (lower, upper) = self.sum_bounds(context);
            let _ = context.set_lower_bound(self.sum, saturate(lower))?;
            let _ = context.set_upper_bound(self.sum, saturate(upper))?;

            let lower_bound = context.lower_bound(self.sum) as i64;
            let upper_bound = context.upper_bound(self.sum) as i64;

            let uncommitted = context
                .envelope_values(self.set)
                .filter(|&value| value != 0 && !context.kernel_contains(self.set, value))
                .collect::<Vec<_>>();

            let mut changed = false;
            for value in uncommitted {
                if context.is_aborted() {
                    return Ok(());
                }

                let kernel = context.value(self.kernel_sum);
                let positive = context.value(self.positive_sum);
                let negative = context.value(self.negative_sum);
                let signed = value as i64;

                let (too_large, too_small) = if value > 0 {
                    (
                        kernel + negative + signed > upper_bound,
                        kernel + positive - signed < lower_bound,
                    )
                } else {
                    (
                        kernel + positive + signed < lower_bound,
                        kernel + negative - signed > upper_bound,
                    )
                };

                if too_large {
                    self.remove(context, value)?;
                    changed = true;
                } else if too_small {
                    self.enforce(context, value)?;
                    changed = true;
                }
            }

            if !changed {
                return Ok(());
            }
        }
    }

    /// The bounds on the sum implied by the current set domain.
    fn sum_bounds(&self, context: &PropagationContext) -> (i64, i64) {
        let kernel = context.value(self.kernel_sum);
        let positive = context.value(self.positive_sum);
        let negative = context.value(self.negative_sum);

        let mut lower = kernel + negative;
        let mut upper = kernel + positive;

        // At least one value of the envelope is taken.
        if self.not_empty && context.kernel_size(self.set) == 0 {
            if negative == 0 {
                lower = context.envelope_values(self.set).next().unwrap_or(0) as i64;
            }
            if positive == 0 {
                upper = context.envelope_values(self.set).last().unwrap_or(0) as i64;
            }
        }

        (lower, upper)
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl Propagator for SetSumPropagator {
    fn name(&self) -> &str {
        "SetSum"
    }

    fn priority(&self) -> Priority {
        Priority::Linear
    }

    fn is_fine_grained(&self) -> bool {
        true
    }

    fn propagation_conditions(&self, local_id: LocalId) -> DomainEvents {
        if local_id == SET_ID {
            DomainEvents::ANY_SET
        } else {
            DomainEvents::BOUNDS
        }
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let sums = Sums::of(&context, self.set);
        context.assign_trailed(self.kernel_sum, sums.kernel);
        context.assign_trailed(self.positive_sum, sums.positive);
        context.assign_trailed(self.negative_sum, sums.negative);

        self.filter(&mut context)
    }

    fn propagate_on_event(
        &mut self,
        mut context: PropagationContext,
        _local_id: LocalId,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        // The sums are brought up to date on every activation, as the sum may be activated before
        // the set.
        self.consume_set_changes(&mut context)?;
        self.filter(&mut context)
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        if self.not_empty && domains.envelope_size(self.set) == 0 {
            return Entailment::False;
        }

        let sums = Sums::of(&domains, self.set);
        let lower = sums.kernel + sums.negative;
        let upper = sums.kernel + sums.positive;
        let lower_bound = domains.lower_bound(self.sum) as i64;
        let upper_bound = domains.upper_bound(self.sum) as i64;

        if upper < lower_bound || lower > upper_bound {
            Entailment::False
        } else if domains.is_instantiated(self.set)
            && domains.fixed_value(self.sum).map(i64::from) == Some(sums.kernel)
        {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
