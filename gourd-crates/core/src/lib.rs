//! # gourd-core
//!
//! The propagation core of a constraint programming solver over integer, set and graph
//! variables.
//!
//! A model is built on a [`engine::State`]: variables are created on the state, and constraints
//! are posted as propagators, directly through [`engine::State::add_propagator`] or through the
//! helpers in [`constraints`]. An external search then alternates between decisions,
//! [`engine::State::propagate_to_fixed_point`], and checkpoints which are restored on
//! backtracking.
//!
//! ```
//! use gourd_core::constraints;
//! use gourd_core::constraints::Constraint;
//! use gourd_core::engine::State;
//! use gourd_core::propagation::ReadDomains;
//!
//! let mut state = State::default();
//! let set = state.new_set_variable(&[1, 5, 7, 8], &[1, 5, 7, 8], None).unwrap();
//! let sum = state.new_integer_variable(0, 100, None).unwrap();
//!
//! constraints::set_sum(set, sum, true).post(&mut state).unwrap();
//! let _ = state.propagate_to_fixed_point().unwrap();
//!
//! assert_eq!(Some(21), state.fixed_value(sum));
//! ```
//!
//! Writing new propagators is described in [`propagation`].

#[doc(hidden)]
pub mod asserts;
pub mod basic_types;
pub mod constraints;
pub mod containers;
pub mod engine;
pub mod propagation;
pub mod propagators;
pub mod statistics;

pub use convert_case;

pub use basic_types::Contradiction;
pub use basic_types::Entailment;
pub use basic_types::ModelError;
