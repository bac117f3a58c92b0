// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # asg-standby
//!
//! An idempotent reconciler for the standby state of autoscaling group instances.
//!
//! ## Overview
//!
//! Given a group, a set of instance ids and a desired lifecycle state, the
//! reconciler moves only the instances that are not yet in that state, in a
//! single batched provider call, and reports whether anything changed.
//!
//! ## Architecture
//!
//! 1. **Desired State**: group, instance ids and `standby`/`inservice`, from
//!    flags, environment or a YAML task file
//! 2. **Observed State**: a fresh snapshot of the group from the provider
//! 3. **Reconciler**: computes the change-set and applies at most one transition
//!
//! ## Modules
//!
//! - [`config`]: Task parsing and validation
//! - [`provider`]: AWS CLI discovery, group snapshots, transition execution
//! - [`planner`]: Change-set computation and transition requests
//! - [`reconciler`]: Orchestration of one reconciliation pass
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! name: web-asg
//! instance_ids:
//!   - i-0123456789abcdef0
//! state: standby
//! should_decrement: false
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod planner;
pub mod provider;
pub mod reconciler;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, DesiredState, StandbyConfig};
pub use error::{Result, StandbyError};
pub use planner::{ChangeSet, StateDiffer, TransitionAction, TransitionExecutor, TransitionRequest};
pub use provider::{
    AutoscalingGroup, AwsCli, AwsCliExecutor, GroupObserver, GroupSource, LifecycleState,
};
pub use reconciler::{ReconcileOutcome, ReconcilePlan, Reconciler};
