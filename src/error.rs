//! Future-specific error types

use thiserror::Error;

/// Errors surfaced by a [`TaskFuture`](crate::TaskFuture).
///
/// Every abnormal path lands here: construction validation, the
/// not-yet-settled sentinel, both cancellation causes, an explicit
/// computation error, and a contained panic. All variants are `Clone` so a
/// settled outcome can be handed out again on every later
/// [`result`](crate::TaskFuture::result) call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FutureError {
    /// The builder was finished without a computation; nothing was spawned.
    #[error("computation is required")]
    MissingComputation,

    /// The future has not settled yet. Informational, not a failure of the
    /// computation.
    #[error("running")]
    Running,

    /// Settled by an explicit cancel, either from the owning handle or from
    /// the computation itself through its
    /// [`FutureContext`](crate::FutureContext).
    #[error("cancelled")]
    Cancelled,

    /// Settled by expiry of the configured timeout.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The computation returned an error.
    #[error("computation failed: {0}")]
    Computation(String),

    /// The computation panicked; the payload was captured at the task
    /// boundary and never escapes.
    #[error("computation panicked: {0}")]
    Panicked(String),
}

impl FutureError {
    /// True for the not-yet-settled sentinel.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// True when settlement was caused by cancellation, whether explicit or
    /// deadline-driven.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(FutureError::Running.to_string(), "running");
        assert_eq!(FutureError::Cancelled.to_string(), "cancelled");
        assert_eq!(
            FutureError::DeadlineExceeded.to_string(),
            "deadline exceeded"
        );
        assert_eq!(
            FutureError::Panicked("boom".to_string()).to_string(),
            "computation panicked: boom"
        );
        assert_eq!(
            FutureError::Computation("bad input".to_string()).to_string(),
            "computation failed: bad input"
        );
    }

    #[test]
    fn test_is_running() {
        assert!(FutureError::Running.is_running());
        assert!(!FutureError::Cancelled.is_running());
    }

    #[test]
    fn test_is_cancellation() {
        assert!(FutureError::Cancelled.is_cancellation());
        assert!(FutureError::DeadlineExceeded.is_cancellation());
        assert!(!FutureError::Running.is_cancellation());
        assert!(!FutureError::Panicked("boom".to_string()).is_cancellation());
        assert!(!FutureError::MissingComputation.is_cancellation());
    }
}
