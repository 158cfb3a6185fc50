use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// A kind of change to a domain.
///
/// A single mutation may trigger several events; tightening the lower bound of an integer
/// variable onto its upper bound triggers [`DomainEvent::LowerBound`], [`DomainEvent::Assign`]
/// and [`DomainEvent::Removal`].
#[derive(Debug, Hash, EnumSetType)]
pub enum DomainEvent {
    /// The lower bound of an integer variable increased.
    LowerBound,
    /// The upper bound of an integer variable decreased.
    UpperBound,
    /// An integer variable became fixed.
    Assign,
    /// At least one value was removed from an integer variable.
    Removal,
    /// A value was added to the kernel of a set variable.
    SetEnforce,
    /// A value was removed from the envelope of a set variable.
    SetRemove,
    /// An arc was added to the kernel of a graph variable.
    ArcEnforce,
    /// An arc was removed from the envelope of a graph variable.
    ArcRemove,
}

impl DomainEvent {
    /// The delta log in which the elements affected by this event are recorded, if any.
    pub(crate) fn delta_kind(self) -> Option<DeltaKind> {
        match self {
            DomainEvent::Removal => Some(DeltaKind::ValueRemoved),
            DomainEvent::SetEnforce => Some(DeltaKind::SetEnforce),
            DomainEvent::SetRemove => Some(DeltaKind::SetRemove),
            DomainEvent::ArcEnforce => Some(DeltaKind::ArcEnforce),
            DomainEvent::ArcRemove => Some(DeltaKind::ArcRemove),
            DomainEvent::LowerBound | DomainEvent::UpperBound | DomainEvent::Assign => None,
        }
    }
}

/// The kinds of element-level records kept per variable; see
/// [`PropagationContext::for_each_delta`](crate::propagation::PropagationContext::for_each_delta).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, enum_map::Enum)]
pub enum DeltaKind {
    /// Ranges of values removed from an integer variable.
    ValueRemoved,
    /// Values added to the kernel of a set variable.
    SetEnforce,
    /// Values removed from the envelope of a set variable.
    SetRemove,
    /// Arcs added to the kernel of a graph variable.
    ArcEnforce,
    /// Arcs removed from the envelope of a graph variable.
    ArcRemove,
}

/// The set of events a propagator subscribes to for one of its variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Any change to an integer variable.
    pub const ANY_INT: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::LowerBound | DomainEvent::UpperBound | DomainEvent::Assign | DomainEvent::Removal
    ));
    /// Changes to either bound of an integer variable.
    pub const BOUNDS: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound));
    pub const LOWER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::LowerBound));
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::UpperBound));
    pub const ASSIGN: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Assign));
    /// Any value removal, including through the bounds.
    pub const REMOVAL: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Removal));
    /// Any change to a set variable.
    pub const ANY_SET: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::SetEnforce | DomainEvent::SetRemove));
    pub const SET_ENFORCE: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::SetEnforce));
    pub const SET_REMOVE: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::SetRemove));
    /// Any change to a graph variable.
    pub const ANY_GRAPH: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::ArcEnforce | DomainEvent::ArcRemove));
    pub const ARC_ENFORCE: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::ArcEnforce));
    pub const ARC_REMOVE: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::ArcRemove));

    pub const fn new(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn events(&self) -> EnumSet<DomainEvent> {
        self.events
    }
}
