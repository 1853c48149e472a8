//! Deferred handles.
//!
//! A `Deferred` is a cloneable handle to one in-flight computation that settles
//! to `Ok(T)` or `Err(E)`. Every handle is stamped with a `DeferredId` when it is
//! created; clones share that id, and the id is the only thing the resolver
//! compares when deciding whether a handle is "the same one" as before.

use std::fmt;
use std::future::{Future, pending, ready};
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::oneshot;

/// Opaque identity of a deferred handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeferredId(pub u64);

static NEXT_DEFERRED_ID: AtomicU64 = AtomicU64::new(0);

impl DeferredId {
    fn next() -> Self {
        Self(NEXT_DEFERRED_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DeferredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a computation that will eventually settle.
///
/// The underlying future is shared, so any number of continuations can wait
/// on the same handle and all of them observe the same outcome.
pub struct Deferred<T, E> {
    id: DeferredId,
    future: Shared<BoxFuture<'static, Result<T, E>>>,
}

impl<T, E> Deferred<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Wraps a future as a new deferred handle with a fresh identity.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            id: DeferredId::next(),
            future: future.boxed().shared(),
        }
    }

    /// A handle that is already settled with a value.
    ///
    /// It is still a deferred handle: the resolver treats it as pending until
    /// its continuation runs.
    pub fn resolved(value: T) -> Self {
        Self::new(ready(Ok(value)))
    }

    /// A handle that is already settled with an error.
    pub fn rejected(error: E) -> Self {
        Self::new(ready(Err(error)))
    }

    /// Returns a handle together with the `Settler` that completes it.
    ///
    /// Dropping the settler without settling leaves the handle pending forever.
    pub fn pair() -> (Settler<T, E>, Self) {
        let (tx, rx) = oneshot::channel();
        let deferred = Self::new(async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => pending().await,
            }
        });
        (Settler { tx }, deferred)
    }
}

impl<T, E> Deferred<T, E>
where
    T: Clone,
    E: Clone,
{
    /// Future that completes with this handle's outcome.
    pub fn settled(&self) -> Shared<BoxFuture<'static, Result<T, E>>> {
        self.future.clone()
    }

    /// The outcome, if the shared future has already been driven to completion.
    pub fn peek(&self) -> Option<&Result<T, E>> {
        self.future.peek()
    }
}

impl<T, E> Deferred<T, E> {
    pub fn id(&self) -> DeferredId {
        self.id
    }

    /// Identity comparison: true for clones of the same handle.
    pub fn is_same(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            future: self.future.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Producer half of [`Deferred::pair`].
#[derive(Debug)]
pub struct Settler<T, E> {
    tx: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Settler<T, E> {
    pub fn resolve(self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(self, error: E) {
        self.settle(Err(error));
    }

    /// Completes the paired handle. A no-op if every handle clone is gone.
    pub fn settle(self, outcome: Result<T, E>) {
        let _ = self.tx.send(outcome);
    }
}

/// A value supplied to the resolver on a render pass.
#[derive(Debug, Clone)]
pub enum Input<T, E> {
    /// Already settled; rendered immediately.
    Ready(T),
    /// Still in flight.
    Deferred(Deferred<T, E>),
}

impl<T, E> Input<T, E> {
    pub fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    pub fn as_deferred(&self) -> Option<&Deferred<T, E>> {
        match self {
            Self::Ready(_) => None,
            Self::Deferred(deferred) => Some(deferred),
        }
    }
}

impl<T, E> From<Deferred<T, E>> for Input<T, E> {
    fn from(deferred: Deferred<T, E>) -> Self {
        Self::Deferred(deferred)
    }
}
