//! The future engine: construction, settlement, wait/result/cancel

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::task::JoinError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{FutureContext, FutureError, FutureState};

/// Unique future identifier using UUID v7 (time-ordered)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FutureId(pub uuid::Uuid);

impl FutureId {
    /// Create a new future ID
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for FutureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FutureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-erased computation: takes the control handle, yields the outcome
type Computation<T> =
    Box<dyn FnOnce(FutureContext) -> BoxFuture<'static, Result<T, anyhow::Error>> + Send>;

/// Settlement record shared between the handle and the supervisor.
///
/// `outcome` is written at most once, under the mutex, before `settled` is
/// fired; readers take the same mutex, so a non-`Running` outcome is final
/// and identical for every reader.
struct Shared<T> {
    outcome: Mutex<Option<Result<T, FutureError>>>,
    settled: CancellationToken,
}

/// Builder for [`TaskFuture`] (builder pattern)
///
/// The computation is required; finishing the builder without one fails with
/// [`FutureError::MissingComputation`] and spawns nothing. A timeout is
/// optional: when set, an absolute deadline is armed at spawn time and the
/// future auto-cancels if it has not settled by then.
pub struct FutureBuilder<T> {
    computation: Option<Computation<T>>,
    timeout: Option<Duration>,
}

impl<T: Send + 'static> FutureBuilder<T> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            computation: None,
            timeout: None,
        }
    }

    /// Set the computation to run
    pub fn computation<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce(FutureContext) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T, anyhow::Error>> + Send + 'static,
    {
        self.computation = Some(Box::new(move |cx| Box::pin(f(cx))));
        self
    }

    /// Arm deadline-based auto-cancellation
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate and start the computation immediately
    pub fn spawn(self) -> Result<TaskFuture<T>, FutureError> {
        let computation = self.computation.ok_or(FutureError::MissingComputation)?;
        Ok(TaskFuture::start(computation, self.timeout))
    }
}

impl<T: Send + 'static> Default for FutureBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a single asynchronous computation.
///
/// The computation starts running on its own tokio task the moment the
/// handle is constructed and settles exactly once: with its value, with its
/// error, with a captured panic, or with a cancellation/timeout error,
/// whichever the engine observes first. Once settled the outcome never
/// changes; a handle is not reusable for a second computation.
///
/// Handles are cheap to clone; every clone observes the same settlement.
///
/// # Cancellation is cooperative
///
/// [`cancel`](Self::cancel) and deadline expiry settle the future
/// immediately, but the computation itself is only notified through its
/// [`FutureContext`] and must observe that signal to stop promptly. A
/// computation that ignores it keeps running detached, holding whatever
/// resources it owns, and its late result is discarded. This is an accepted,
/// documented limitation.
pub struct TaskFuture<T> {
    id: FutureId,
    shared: Arc<Shared<T>>,
    cx: FutureContext,
}

impl<T> Clone for TaskFuture<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            shared: Arc::clone(&self.shared),
            cx: self.cx.clone(),
        }
    }
}

impl<T> std::fmt::Debug for TaskFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFuture")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

impl<T: Send + 'static> TaskFuture<T> {
    /// Create a [`FutureBuilder`]
    pub fn builder() -> FutureBuilder<T> {
        FutureBuilder::new()
    }

    /// Start a computation with no deadline.
    ///
    /// The future then only settles through completion or an explicit cancel.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(FutureContext) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T, anyhow::Error>> + Send + 'static,
    {
        Self::start(Box::new(move |cx| Box::pin(f(cx))), None)
    }

    /// Start a computation that auto-cancels after `timeout`
    pub fn spawn_with_timeout<F, Fut>(f: F, timeout: Duration) -> Self
    where
        F: FnOnce(FutureContext) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T, anyhow::Error>> + Send + 'static,
    {
        Self::start(Box::new(move |cx| Box::pin(f(cx))), Some(timeout))
    }

    fn start(computation: Computation<T>, timeout: Option<Duration>) -> Self {
        let id = FutureId::new();
        let cx = FutureContext::new(id.clone(), CancellationToken::new());
        let shared = Arc::new(Shared {
            outcome: Mutex::new(None),
            settled: CancellationToken::new(),
        });
        let deadline = timeout.map(|t| Instant::now() + t);

        tracing::debug!(future_id = %id, timeout = ?timeout, "Spawning future");
        tokio::spawn(supervise(
            id.clone(),
            Arc::clone(&shared),
            cx.clone(),
            computation,
            deadline,
        ));

        Self { id, shared, cx }
    }
}

impl<T: Clone> TaskFuture<T> {
    /// Non-blocking read of the settlement state.
    ///
    /// Returns [`FutureError::Running`] until the future settles; afterwards
    /// it returns the settled outcome, identically on every call. Calling
    /// this before ever waiting is legal.
    pub fn result(&self) -> Result<T, FutureError> {
        match &*self.shared.outcome.lock() {
            Some(outcome) => outcome.clone(),
            None => Err(FutureError::Running),
        }
    }
}

impl<T> TaskFuture<T> {
    /// Id of this future
    pub fn id(&self) -> &FutureId {
        &self.id
    }

    /// Block the caller for at most `timeout`, returning `true` as soon as
    /// the future settles.
    ///
    /// Returns `false` if `timeout` elapses first, leaving the future still
    /// running; waiting again later is fine. Safe to call concurrently from
    /// any number of callers and after settlement (immediate `true`).
    pub async fn wait(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.shared.settled.cancelled())
            .await
            .is_ok()
    }

    /// Request settlement via cancellation.
    ///
    /// Idempotent and non-blocking; has no effect after settlement. The
    /// running computation observes the request through its
    /// [`FutureContext`].
    pub fn cancel(&self) {
        self.cx.cancel();
    }

    /// Current lifecycle state
    pub fn state(&self) -> FutureState {
        match &*self.shared.outcome.lock() {
            Some(Ok(_)) => FutureState::Resolved,
            Some(Err(_)) => FutureState::Failed,
            None => FutureState::Running,
        }
    }

    /// Whether the future has settled
    pub fn is_settled(&self) -> bool {
        self.state().is_terminal()
    }
}

/// Runs beside the computation and commits the first settlement cause.
///
/// The computation gets its own spawned task so that a panic is contained at
/// the task boundary. The select race decides the outcome: whichever of
/// {completion, cancel, deadline} is observed first wins, and the losers
/// become no-ops. When cancel or deadline wins, the computation's join
/// handle is dropped and the task is left to finish on its own.
async fn supervise<T: Send + 'static>(
    id: FutureId,
    shared: Arc<Shared<T>>,
    cx: FutureContext,
    computation: Computation<T>,
    deadline: Option<Instant>,
) {
    let work = tokio::spawn(computation(cx.clone()));

    let outcome = tokio::select! {
        finished = work => match finished {
            Ok(Ok(value)) => {
                tracing::debug!(future_id = %id, "Future resolved");
                Ok(value)
            }
            Ok(Err(err)) => {
                tracing::warn!(future_id = %id, error = %err, "Future failed");
                Err(FutureError::Computation(err.to_string()))
            }
            Err(join_err) => Err(contain_fault(&id, join_err)),
        },
        _ = cx.cancelled() => {
            tracing::debug!(future_id = %id, "Future cancelled");
            Err(FutureError::Cancelled)
        }
        _ = sleep_until_deadline(deadline) => {
            tracing::warn!(future_id = %id, "Future deadline exceeded");
            // let the computation observe the timeout through its handle
            cx.cancel();
            Err(FutureError::DeadlineExceeded)
        }
    };

    let mut slot = shared.outcome.lock();
    if slot.is_none() {
        *slot = Some(outcome);
    }
    drop(slot);
    shared.settled.cancel();
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Convert an abnormal task termination into a settled error.
///
/// Panic payloads are matched over the closed set of shapes `panic!`
/// produces: a `&'static str`, a formatted `String`, or anything else.
fn contain_fault(id: &FutureId, err: JoinError) -> FutureError {
    match err.try_into_panic() {
        Ok(payload) => {
            let message = if let Some(text) = payload.downcast_ref::<&'static str>() {
                (*text).to_string()
            } else if let Some(text) = payload.downcast_ref::<String>() {
                text.clone()
            } else {
                "non-string panic payload".to_string()
            };
            tracing::warn!(future_id = %id, panic = %message, "Future panicked");
            FutureError::Panicked(message)
        }
        // not a panic: the runtime tore the task down
        Err(_) => FutureError::Cancelled,
    }
}
