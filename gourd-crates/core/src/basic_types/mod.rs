mod entailment;
mod model_error;
mod propagation_status;
mod trail;

pub use entailment::*;
pub use model_error::*;
pub use propagation_status::*;
pub(crate) use trail::*;
