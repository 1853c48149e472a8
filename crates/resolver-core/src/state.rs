//! Resolver state types.

use std::time::Duration;

use crate::deferred::{Deferred, DeferredId, Input};

/// Delay used when props don't specify one.
pub const DEFAULT_DELAY_MS: i64 = 200;

/// What a rendering function sees.
///
/// Exactly one of `value`/`error` is meaningful at a time. `is_loading` is
/// independent and can be true while a stale value or error from the previous
/// cycle is still present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState<T, E> {
    pub value: Option<T>,
    pub error: Option<E>,
    pub is_loading: bool,
}

impl<T, E> Default for RenderState<T, E> {
    fn default() -> Self {
        Self {
            value: None,
            error: None,
            is_loading: false,
        }
    }
}

impl<T, E> RenderState<T, E> {
    pub fn settled(value: T) -> Self {
        Self {
            value: Some(value),
            error: None,
            is_loading: false,
        }
    }

    pub fn failed(error: E) -> Self {
        Self {
            value: None,
            error: Some(error),
            is_loading: false,
        }
    }

    /// Nothing to show yet: no value, no error, not loading.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.error.is_none() && !self.is_loading
    }
}

/// Props supplied by the host on every render pass.
#[derive(Debug, Clone)]
pub struct Props<T, E> {
    pub value: Input<T, E>,
    /// Debounce for the loading indicator, in milliseconds.
    ///
    /// `None`, zero and negative values all show the indicator immediately.
    pub delay: Option<i64>,
}

impl<T, E> Props<T, E> {
    /// Props with the default delay.
    pub fn new(value: impl Into<Input<T, E>>) -> Self {
        Self {
            value: value.into(),
            delay: Some(DEFAULT_DELAY_MS),
        }
    }

    /// Props for an already-settled value.
    pub fn ready(value: T) -> Self {
        Self::new(Input::Ready(value))
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Option<i64>) -> Self {
        self.delay = delay;
        self
    }

    /// Positive delay as a duration, or `None` when loading shows immediately.
    pub fn debounce(&self) -> Option<Duration> {
        match self.delay {
            Some(ms) if ms > 0 => Some(Duration::from_millis(ms as u64)),
            _ => None,
        }
    }
}

impl<T, E> From<Input<T, E>> for Props<T, E> {
    fn from(value: Input<T, E>) -> Self {
        Self::new(value)
    }
}

/// Internal state: the render projection plus the tracked handle.
#[derive(Debug, Clone)]
pub struct ResolverState<T, E> {
    pub render: RenderState<T, E>,
    /// The current deferred handle, kept after it settles so that
    /// re-supplying it is recognised as "no change".
    pub tracked: Option<Deferred<T, E>>,
    /// Whether `tracked` has delivered its outcome.
    pub settled: bool,
    /// Bumped on every change to `render`; hosts redraw when it moves.
    pub revision: u64,
}

impl<T, E> Default for ResolverState<T, E> {
    fn default() -> Self {
        Self {
            render: RenderState::default(),
            tracked: None,
            settled: false,
            revision: 0,
        }
    }
}

impl<T, E> ResolverState<T, E> {
    pub fn tracked_id(&self) -> Option<DeferredId> {
        self.tracked.as_ref().map(Deferred::id)
    }

    /// A tracked handle exists and has not settled yet.
    pub fn is_pending(&self) -> bool {
        self.tracked.is_some() && !self.settled
    }

    /// Replaces the render projection and bumps the revision.
    pub fn set_render(&mut self, render: RenderState<T, E>) {
        self.render = render;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        if self.render.is_loading != is_loading {
            self.render.is_loading = is_loading;
            self.revision = self.revision.wrapping_add(1);
        }
    }
}
