use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// A flag through which a fixpoint computation can be asked to stop, from any thread.
///
/// The engine checks the flag before running each propagator; propagators with long filtering
/// loops can poll it through
/// [`PropagationContext::is_aborted`](crate::propagation::PropagationContext::is_aborted).
#[derive(Clone, Debug, Default)]
pub struct AbortSignal {
    aborted: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.aborted.store(false, Ordering::Relaxed);
    }
}
