//! Transition executor interface.
//!
//! The executor is the only component that asks the provider to change
//! anything. It sends the whole change-set as one request and does not
//! poll for the transition to complete.

use async_trait::async_trait;

use crate::error::TransitionError;

use super::plan::TransitionRequest;

/// Applies batched lifecycle transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransitionExecutor: Send + Sync {
    /// Applies one transition covering the entire change-set.
    ///
    /// Implementations must reject an empty change-set with
    /// [`TransitionError::EmptyChangeSet`] without contacting the provider,
    /// and must surface any provider failure with its raw diagnostic.
    async fn apply_transition(&self, request: &TransitionRequest) -> Result<(), TransitionError>;

    /// Gets the executor type name.
    fn executor_type(&self) -> &'static str;
}

#[async_trait]
impl<T: TransitionExecutor + ?Sized> TransitionExecutor for Box<T> {
    async fn apply_transition(&self, request: &TransitionRequest) -> Result<(), TransitionError> {
        (**self).apply_transition(request).await
    }

    fn executor_type(&self) -> &'static str {
        (**self).executor_type()
    }
}
