/// Whether a constraint is satisfied by every completion of the current domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entailment {
    /// Every completion satisfies the constraint.
    True,
    /// No completion satisfies the constraint.
    False,
    /// Not decided by the current domains.
    Undefined,
}

impl Entailment {
    /// Combine the entailment of two constraints which must both hold.
    pub fn and(self, other: Entailment) -> Entailment {
        match (self, other) {
            (Entailment::False, _) | (_, Entailment::False) => Entailment::False,
            (Entailment::True, Entailment::True) => Entailment::True,
            _ => Entailment::Undefined,
        }
    }
}
