//! Control handle passed into the running computation

use tokio_util::sync::CancellationToken;

use crate::FutureId;

/// Capability handed to a running computation.
///
/// Through its context a computation can request cancellation of its own
/// future (for example after detecting an inconsistent state) and observe
/// whether cancellation or a timeout has already fired, either with a
/// non-blocking [`is_cancelled`](Self::is_cancelled) probe or by awaiting
/// [`cancelled`](Self::cancelled) for cooperative early exit.
///
/// The context deliberately exposes no way to read the computation's own
/// in-progress value.
#[derive(Debug, Clone)]
pub struct FutureContext {
    id: FutureId,
    cancel: CancellationToken,
}

impl FutureContext {
    pub(crate) fn new(id: FutureId, cancel: CancellationToken) -> Self {
        Self { id, cancel }
    }

    /// Id of the future this computation belongs to
    pub fn id(&self) -> &FutureId {
        &self.id
    }

    /// Request cancellation of this future.
    ///
    /// Identical semantics to [`TaskFuture::cancel`](crate::TaskFuture::cancel);
    /// idempotent, never blocks.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(future_id = %self.id, "Cancellation requested");
        }
        self.cancel.cancel();
    }

    /// Non-blocking check whether cancellation or a timeout has fired
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once cancellation or a timeout has fired.
    ///
    /// Resolves immediately if the signal already fired; safe to await from
    /// multiple places.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}
