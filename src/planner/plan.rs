//! Transition request types.
//!
//! A [`TransitionRequest`] is built once per reconciliation from a non-empty
//! [`ChangeSet`] and handed to a [`super::TransitionExecutor`].

use serde::Serialize;
use std::fmt;

use crate::config::DesiredState;

/// Ordered instance identifiers that need a lifecycle transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    instance_ids: Vec<String>,
}

impl ChangeSet {
    /// Creates a change-set, keeping the given order.
    #[must_use]
    pub const fn new(instance_ids: Vec<String>) -> Self {
        Self { instance_ids }
    }

    /// Returns true if nothing needs to change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instance_ids.is_empty()
    }

    /// Number of instances in the change-set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instance_ids.len()
    }

    /// Instance identifiers in order.
    #[must_use]
    pub fn instance_ids(&self) -> &[String] {
        &self.instance_ids
    }

    /// Consumes the change-set, returning the identifiers.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.instance_ids
    }
}

/// The provider operation a request maps to.
///
/// The capacity flag only exists on the standby side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum TransitionAction {
    /// Move instances into standby.
    EnterStandby {
        /// Lower desired capacity by the number of instances entering standby.
        decrement_capacity: bool,
    },
    /// Return instances to service.
    ExitStandby,
}

impl TransitionAction {
    /// Picks the action for a desired state.
    ///
    /// `decrement_capacity` is dropped for [`DesiredState::InService`].
    #[must_use]
    pub const fn for_state(desired: DesiredState, decrement_capacity: bool) -> Self {
        match desired {
            DesiredState::Standby => Self::EnterStandby { decrement_capacity },
            DesiredState::InService => Self::ExitStandby,
        }
    }

    /// Desired state reached by this action.
    #[must_use]
    pub const fn target(self) -> DesiredState {
        match self {
            Self::EnterStandby { .. } => DesiredState::Standby,
            Self::ExitStandby => DesiredState::InService,
        }
    }

    /// Capacity flag, `None` when the action has none.
    #[must_use]
    pub const fn decrement_capacity(self) -> Option<bool> {
        match self {
            Self::EnterStandby { decrement_capacity } => Some(decrement_capacity),
            Self::ExitStandby => None,
        }
    }
}

impl fmt::Display for TransitionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnterStandby { .. } => write!(f, "enter-standby"),
            Self::ExitStandby => write!(f, "exit-standby"),
        }
    }
}

/// One batched lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRequest {
    /// Target group.
    pub group: String,
    /// Instances to transition together.
    pub change_set: ChangeSet,
    /// Provider operation and its options.
    pub action: TransitionAction,
    /// Alternate credential profile.
    pub profile: Option<String>,
}

impl TransitionRequest {
    /// Builds a request for the desired state.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        change_set: ChangeSet,
        desired: DesiredState,
        decrement_capacity: bool,
        profile: Option<String>,
    ) -> Self {
        Self {
            group: group.into(),
            change_set,
            action: TransitionAction::for_state(desired, decrement_capacity),
            profile,
        }
    }
}

impl fmt::Display for TransitionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {}",
            self.action,
            self.change_set.instance_ids().join(", "),
            self.group
        )?;
        if let Some(decrement) = self.action.decrement_capacity() {
            write!(f, " (decrement capacity: {decrement})")?;
        }
        Ok(())
    }
}
