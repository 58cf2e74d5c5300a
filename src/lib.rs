//! Single-value asynchronous computation handle.
//!
//! A [`TaskFuture`] runs one caller-supplied computation on its own tokio
//! task and settles exactly once: with the computation's value, with its
//! error, with a captured panic, or with a cancellation/timeout error,
//! whichever the engine observes first. Callers wait with a bounded
//! duration, read the outcome without blocking, and may cancel at any time;
//! the computation can also cancel itself through the [`FutureContext`] it
//! receives.
//!
//! ```
//! use std::time::Duration;
//! use taskfuture::TaskFuture;
//!
//! # tokio_test::block_on(async {
//! let future = TaskFuture::spawn(|_cx| async { Ok(42) });
//!
//! assert!(future.wait(Duration::from_secs(1)).await);
//! assert_eq!(future.result().unwrap(), 42);
//! # });
//! ```
//!
//! # Cancellation is cooperative
//!
//! [`TaskFuture::cancel`] and deadline expiry settle the future immediately,
//! but they do not interrupt the computation mid-instruction: the
//! computation is only notified through its [`FutureContext`] and must
//! observe [`FutureContext::cancelled`] (or poll
//! [`FutureContext::is_cancelled`]) to stop promptly. A computation that
//! ignores the signal keeps running detached after the future has already
//! reported failure, holding whatever resources it owns, and any value it
//! later produces is discarded. This is an accepted, documented limitation.

pub mod context;
pub mod error;
pub mod future;
pub mod state;

pub use context::FutureContext;
pub use error::FutureError;
pub use future::{FutureBuilder, FutureId, TaskFuture};
pub use state::FutureState;
