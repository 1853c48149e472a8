//! Resolver effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent task spawning and timer cancellation only; the reducer
//! never spawns or cancels anything itself.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::deferred::{Deferred, DeferredId};
use crate::task::TimerId;

#[derive(Debug)]
pub enum ResolverEffect<T, E> {
    /// Attach success/failure continuations to the handle.
    Attach { deferred: Deferred<T, E> },

    /// Arm the loading-indicator timer for the handle.
    ArmTimer {
        id: DeferredId,
        timer: TimerId,
        delay: Duration,
    },

    /// Cancel a previously armed timer.
    CancelTimer { token: CancellationToken },
}
