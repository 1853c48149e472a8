//! Events delivered to the resolver's inbox by background callbacks.

use crate::deferred::DeferredId;
use crate::task::TimerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverEvent<T, E> {
    /// A continuation observed its handle settle.
    Settled {
        id: DeferredId,
        outcome: Result<T, E>,
    },
    /// The loading-indicator timer armed as `timer` for `id` fired.
    DelayElapsed { id: DeferredId, timer: TimerId },
}

impl<T, E> ResolverEvent<T, E> {
    /// The handle this event originated from.
    pub fn origin(&self) -> DeferredId {
        match self {
            Self::Settled { id, .. } | Self::DelayElapsed { id, .. } => *id,
        }
    }
}
