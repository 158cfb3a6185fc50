/// A list of tuples, which are either the only allowed assignments of a table or the forbidden
/// ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tuples {
    tuples: Vec<Box<[i32]>>,
    feasible: bool,
}

impl Tuples {
    /// The assignments of a table which are allowed; every other assignment is forbidden.
    pub fn allowed(tuples: impl IntoIterator<Item = impl Into<Box<[i32]>>>) -> Tuples {
        Tuples {
            tuples: tuples.into_iter().map(Into::into).collect(),
            feasible: true,
        }
    }

    /// The assignments of a table which are forbidden; every other assignment is allowed.
    pub fn forbidden(tuples: impl IntoIterator<Item = impl Into<Box<[i32]>>>) -> Tuples {
        Tuples {
            tuples: tuples.into_iter().map(Into::into).collect(),
            feasible: false,
        }
    }

    pub fn add(&mut self, tuple: impl Into<Box<[i32]>>) {
        self.tuples.push(tuple.into());
    }

    /// Whether the tuples are the allowed assignments.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.tuples.iter().map(|tuple| tuple.as_ref())
    }
}
