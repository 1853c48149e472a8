//! Resolver reducer.
//!
//! All state mutations happen here. The runtime calls these functions and
//! executes the returned effects:
//!
//! - `derive`: props -> state, on every render pass (pure, no effects)
//! - `start_lifecycle`: effects to run when the tracked handle changes
//! - `update`: applies a callback event from the inbox

use tracing::trace;

use crate::deferred::Input;
use crate::effects::ResolverEffect;
use crate::events::ResolverEvent;
use crate::state::{Props, RenderState, ResolverState};
use crate::task::TimerState;

/// Computes the next state from the previous state and the incoming props.
///
/// - plain value: rendered immediately, tracked handle cleared
/// - same handle as tracked: unchanged
/// - new handle: tracked; loading shows at once only without a positive delay
pub fn derive<T, E>(prev: ResolverState<T, E>, props: &Props<T, E>) -> ResolverState<T, E>
where
    T: Clone,
{
    match &props.value {
        Input::Ready(value) => ResolverState {
            render: RenderState::settled(value.clone()),
            tracked: None,
            settled: false,
            revision: prev.revision.wrapping_add(1),
        },
        Input::Deferred(deferred) if prev.tracked_id() == Some(deferred.id()) => prev,
        Input::Deferred(deferred) => {
            let mut next = ResolverState {
                tracked: Some(deferred.clone()),
                settled: false,
                ..prev
            };
            next.set_loading(props.debounce().is_none());
            next
        }
    }
}

/// Effects that (re)start the async lifecycle for the tracked handle.
///
/// Any armed timer is disarmed first; its cancel effect always comes before
/// the new continuations.
pub fn start_lifecycle<T, E>(
    state: &ResolverState<T, E>,
    timer: &mut TimerState,
    props: &Props<T, E>,
) -> Vec<ResolverEffect<T, E>> {
    let mut effects = Vec::new();
    if let Some(token) = timer.take() {
        effects.push(ResolverEffect::CancelTimer { token });
    }

    let Some(deferred) = &state.tracked else {
        return effects;
    };
    if state.settled {
        return effects;
    }

    effects.push(ResolverEffect::Attach {
        deferred: deferred.clone(),
    });
    if let Some(delay) = props.debounce() {
        effects.push(ResolverEffect::ArmTimer {
            id: deferred.id(),
            timer: timer.next_id(),
            delay,
        });
    }
    effects
}

/// Applies a callback event.
///
/// Events whose originating handle is no longer tracked are dropped.
pub fn update<T, E>(
    state: &mut ResolverState<T, E>,
    timer: &mut TimerState,
    event: ResolverEvent<T, E>,
) -> Vec<ResolverEffect<T, E>> {
    let origin = event.origin();
    if state.tracked_id() != Some(origin) {
        trace!(%origin, "dropping event from superseded handle");
        return vec![];
    }

    match event {
        ResolverEvent::Settled { outcome, .. } => {
            if state.settled {
                return vec![];
            }
            let effects = timer
                .take()
                .map(|token| ResolverEffect::CancelTimer { token })
                .into_iter()
                .collect();
            state.settled = true;
            state.set_render(match outcome {
                Ok(value) => RenderState::settled(value),
                Err(error) => RenderState::failed(error),
            });
            effects
        }
        ResolverEvent::DelayElapsed { timer: armed, .. } => {
            if timer.finish_if_active(armed) && !state.settled {
                state.set_loading(true);
            }
            vec![]
        }
    }
}
