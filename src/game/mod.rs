//! Core game logic: entities, hand evaluation, pot distribution and the
//! per-tick transition function.

pub mod constants;
pub mod entities;
pub mod eval;
pub mod showdown;
mod state_machine;

pub use state_machine::calculate_transition;
