//! Shared scenario helpers for the integration tests.
#![allow(
    dead_code,
    reason = "every test binary includes the helpers, but not every binary uses all of them"
)]

use gourd_core::engine::variables::DomainId;
use gourd_core::engine::variables::SetVariable;
use gourd_core::engine::Fixpoint;
use gourd_core::engine::State;
use gourd_core::propagation::ReadDomains;

/// Route the logs of the engine to the test output; `RUST_LOG=debug` shows checkpoints and
/// contradictions.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Depth-first search over binary decisions, restoring a checkpoint after each branch.
///
/// `branch` returns the two alternatives for the next decision, or `None` if the state is a
/// solution, in which case `on_solution` is called. `apply` returns `false` if the decision
/// immediately empties a domain.
pub(crate) fn enumerate<Decision>(
    state: &mut State,
    branch: &dyn Fn(&State) -> Option<[Decision; 2]>,
    apply: &dyn Fn(&mut State, &Decision) -> bool,
    on_solution: &mut dyn FnMut(&State),
) {
    match state.propagate_to_fixed_point() {
        Ok(Fixpoint::Reached) => {}
        Ok(Fixpoint::Aborted) => panic!("nobody raised the abort signal"),
        Err(_) => return,
    }

    let Some(alternatives) = branch(state) else {
        on_solution(state);
        return;
    };

    for decision in alternatives {
        let checkpoint = state.new_checkpoint();
        if apply(state, &decision) {
            enumerate(state, branch, apply, on_solution);
        }
        state.restore_to(checkpoint);
    }
}

pub(crate) fn domain(state: &State, variable: DomainId) -> Vec<i32> {
    state.iterate_domain(variable).collect()
}

pub(crate) fn envelope(state: &State, set: SetVariable) -> Vec<i32> {
    state.envelope_values(set).collect()
}

pub(crate) fn kernel(state: &State, set: SetVariable) -> Vec<i32> {
    state.kernel_values(set).collect()
}
