//! Resolver runtime - owns state, drains the inbox, executes effects.
//!
//! This is the "Elm runtime" boundary: all spawning happens here. The reducer
//! in `update` stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Continuations and timers run as tokio tasks that never touch state. They
//! send a `ResolverEvent` to `inbox_tx` and the host applies it on its own
//! thread through `pump` (non-blocking, once per frame) or `next_event`
//! (awaits one event). State is therefore only ever mutated by the host.
//!
//! ## Lifecycle
//!
//! `mount` -> any number of `set_props` -> `unmount`. `unmount` cancels the
//! liveness token: armed timers and in-flight continuations stop, and events
//! already queued are discarded.

use std::mem;

use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::effects::ResolverEffect;
use crate::events::ResolverEvent;
use crate::render::{Children, ValueOnly};
use crate::state::{Props, RenderState, ResolverState};
use crate::task::TimerState;
use crate::update;

type InboxSender<T, E> = mpsc::UnboundedSender<ResolverEvent<T, E>>;
type InboxReceiver<T, E> = mpsc::UnboundedReceiver<ResolverEvent<T, E>>;

/// A resolver instance driven by a host.
///
/// `mount`, `set_props`, `pump` and `next_event` spawn tokio tasks and must be
/// called from within a tokio runtime.
pub struct Resolver<T, E, C = ValueOnly> {
    props: Props<T, E>,
    children: C,
    state: ResolverState<T, E>,
    timer: TimerState,
    /// Cancelled at teardown; parent of every timer token.
    alive: CancellationToken,
    mounted: bool,
    inbox_tx: InboxSender<T, E>,
    inbox_rx: InboxReceiver<T, E>,
}

impl<T, E> Resolver<T, E, ValueOnly>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a resolver that renders its raw value.
    pub fn new(props: impl Into<Props<T, E>>) -> Self {
        Self::with_children(props, ValueOnly)
    }
}

impl<T, E, C> Resolver<T, E, C>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    C: Children<T, E>,
{
    /// Creates a resolver that renders through `children`.
    ///
    /// State is derived from the props right away; nothing is spawned until
    /// `mount`.
    pub fn with_children(props: impl Into<Props<T, E>>, children: C) -> Self {
        let props = props.into();
        let state = update::derive(ResolverState::default(), &props);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            props,
            children,
            state,
            timer: TimerState::default(),
            alive: CancellationToken::new(),
            mounted: false,
            inbox_tx,
            inbox_rx,
        }
    }

    /// Mount notification: starts the lifecycle for the tracked handle.
    pub fn mount(&mut self) {
        if self.mounted || self.is_torn_down() {
            return;
        }
        self.mounted = true;
        debug!(tracked = ?self.state.tracked_id(), "resolver mounted");
        let effects = update::start_lifecycle(&self.state, &mut self.timer, &self.props);
        self.execute_effects(effects);
    }

    /// Update notification with new props.
    ///
    /// Derives state first, then restarts the lifecycle if the tracked handle
    /// changed. Before `mount` (or after `unmount`) only the derivation runs.
    pub fn set_props(&mut self, props: impl Into<Props<T, E>>) {
        let props = props.into();
        let prev_tracked = self.state.tracked_id();
        self.state = update::derive(mem::take(&mut self.state), &props);
        self.props = props;

        let tracked = self.state.tracked_id();
        if !self.mounted || prev_tracked == tracked {
            return;
        }
        debug!(from = ?prev_tracked, to = ?tracked, "tracked handle changed");
        let effects = update::start_lifecycle(&self.state, &mut self.timer, &self.props);
        self.execute_effects(effects);
    }

    /// Teardown. Idempotent.
    pub fn unmount(&mut self) {
        if self.is_torn_down() {
            return;
        }
        debug!(tracked = ?self.state.tracked_id(), "resolver unmounted");
        self.mounted = false;
        self.timer.clear();
        self.alive.cancel();
        self.inbox_rx.close();
        while self.inbox_rx.try_recv().is_ok() {}
    }

    /// Produces the output for the current state.
    pub fn render(&self) -> C::Output {
        self.children.render(&self.state.render)
    }

    pub fn state(&self) -> &RenderState<T, E> {
        &self.state.render
    }

    pub fn props(&self) -> &Props<T, E> {
        &self.props
    }

    /// Increases whenever the render state changes.
    pub fn revision(&self) -> u64 {
        self.state.revision
    }

    /// The tracked handle has not settled yet.
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_torn_down(&self) -> bool {
        self.alive.is_cancelled()
    }

    /// Applies every event that has already arrived, without waiting.
    ///
    /// Returns whether the render state changed.
    pub fn pump(&mut self) -> bool {
        let revision = self.state.revision;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.apply(event);
        }
        self.state.revision != revision
    }

    /// Waits for the next callback event and applies it.
    ///
    /// Returns `false` without waiting when there is nothing left to wait for:
    /// not mounted (or torn down), or the tracked handle has settled and no
    /// timer is armed.
    /// While the tracked handle is pending this waits for as long as it takes.
    pub async fn next_event(&mut self) -> bool {
        if !self.mounted || !(self.state.is_pending() || self.timer.is_armed()) {
            return false;
        }
        match self.inbox_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Applies events until the tracked handle settles or the resolver is
    /// torn down.
    pub async fn run_until_settled(&mut self) {
        while self.state.is_pending() && self.next_event().await {}
    }

    fn apply(&mut self, event: ResolverEvent<T, E>) {
        if self.is_torn_down() {
            trace!(origin = %event.origin(), "dropping event after teardown");
            return;
        }
        let effects = update::update(&mut self.state, &mut self.timer, event);
        self.execute_effects(effects);
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<ResolverEffect<T, E>>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: ResolverEffect<T, E>) {
        match effect {
            ResolverEffect::Attach { deferred } => {
                let tx = self.inbox_tx.clone();
                let alive = self.alive.clone();
                let id = deferred.id();
                trace!(%id, "attaching continuations");
                tokio::spawn(async move {
                    tokio::select! {
                        () = alive.cancelled() => {}
                        outcome = deferred.settled() => {
                            let _ = tx.send(ResolverEvent::Settled { id, outcome });
                        }
                    }
                });
            }
            ResolverEffect::ArmTimer { id, timer, delay } => {
                let tx = self.inbox_tx.clone();
                let cancel = self.alive.child_token();
                self.timer.on_armed(timer, cancel.clone());
                trace!(%id, %timer, ?delay, "arming loading timer");
                tokio::spawn(async move {
                    tokio::select! {
                        () = cancel.cancelled() => {}
                        () = time::sleep(delay) => {
                            let _ = tx.send(ResolverEvent::DelayElapsed { id, timer });
                        }
                    }
                });
            }
            ResolverEffect::CancelTimer { token } => {
                token.cancel();
            }
        }
    }
}

impl<T, E, C> Drop for Resolver<T, E, C> {
    fn drop(&mut self) {
        self.alive.cancel();
    }
}
