//! Contains the propagator implementations of gourd.
//!
//! Propagators are not posted directly; see [`crate::constraints`] for the functions which
//! validate a constraint and post its propagators, and [`crate::propagation`] for how a
//! propagator is written.

mod bool_graph_channeling;
mod bool_int_channeling;
mod set_not_empty;
mod set_sum;

pub mod table;

pub(crate) use bool_graph_channeling::*;
pub(crate) use bool_int_channeling::*;
pub(crate) use set_not_empty::*;
pub(crate) use set_sum::*;
