//! Planning module for lifecycle transitions.
//!
//! This module handles the comparison between the requested and observed
//! lifecycle states, and the request handed to the transition executor.

mod diff;
mod plan;
mod executor;

pub use diff::StateDiffer;
pub use plan::{ChangeSet, TransitionAction, TransitionRequest};
pub use executor::TransitionExecutor;
#[cfg(test)]
pub use executor::MockTransitionExecutor;
