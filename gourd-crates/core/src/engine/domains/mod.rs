//! The domain representations of integer, set and graph variables.
//!
//! All mutable domain state is kept in the [`TrailedValues`] store; the structs in this module
//! only hold handles into it. Restoring the store to a checkpoint therefore restores every domain.

mod assignments;
mod graph_domain;
mod integer_domain;
mod modify_domains;
mod read_domains;
mod set_domain;

pub use assignments::Assignments;
pub use graph_domain::GraphOrientation;
pub(crate) use graph_domain::*;
pub use integer_domain::IntegerRepresentation;
pub(crate) use integer_domain::*;
pub use modify_domains::*;
pub use read_domains::*;
pub(crate) use set_domain::*;

use crate::engine::notifications::DomainEvent;
use crate::engine::TrailedValues;

/// A mutation was rejected because it would leave the domain without values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EmptyDomain;

/// A domain described by a lower bound (the kernel) and an upper bound (the envelope) in a
/// lattice of sets. Set variables and graph variables share this shape.
pub(crate) trait EnvelopeKernelDomain {
    type Element: Copy;

    /// Triggered when an element joins the kernel.
    const ENFORCE_EVENT: DomainEvent;
    /// Triggered when an element leaves the envelope.
    const EXCLUDE_EVENT: DomainEvent;

    fn envelope_size(&self, store: &TrailedValues) -> usize;

    fn kernel_size(&self, store: &TrailedValues) -> usize;

    fn in_envelope(&self, store: &TrailedValues, element: Self::Element) -> bool;

    fn in_kernel(&self, store: &TrailedValues, element: Self::Element) -> bool;

    /// Add `element` to the kernel. Fails if it is not in the envelope.
    fn enforce(&self, store: &mut TrailedValues, element: Self::Element)
        -> Result<bool, EmptyDomain>;

    /// Remove `element` from the envelope. Fails if it is in the kernel.
    fn exclude(&self, store: &mut TrailedValues, element: Self::Element)
        -> Result<bool, EmptyDomain>;

    /// The representation of `element` in the delta log.
    fn encode(&self, element: Self::Element) -> i32;

    fn is_fixed(&self, store: &TrailedValues) -> bool {
        self.envelope_size(store) == self.kernel_size(store)
    }
}
