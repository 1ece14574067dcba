//! Work unit state transitions
//!
//! This module handles:
//! - Validating a requested transition against the transition table
//! - Gating entry into `testing` and `done` on discovery, scenario and coverage checks
//! - Applying the transition to the unit and to the state columns in one step

mod preconditions;
mod state;
mod warnings;

#[cfg(test)]
mod tests;

// Public API
pub use state::{block_work_unit, transition_work_unit};
pub use warnings::{TransitionOutcome, Warning};

pub(crate) use state::apply_transition;
