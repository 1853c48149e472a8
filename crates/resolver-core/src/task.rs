use std::fmt;

use tokio_util::sync::CancellationToken;

/// Identity of one arming of the loading timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Default, Clone)]
pub struct TimerSeq {
    next: u64,
}

impl TimerSeq {
    pub fn next_id(&mut self) -> TimerId {
        let id = TimerId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// The pending loading-indicator timer (owned by the resolver instance,
/// mutated only by the reducer and the runtime that arms it).
#[derive(Debug, Default, Clone)]
pub struct TimerState {
    pub seq: TimerSeq,
    pub active: Option<TimerId>,
    pub cancel: Option<CancellationToken>,
}

impl TimerState {
    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    pub fn next_id(&mut self) -> TimerId {
        self.seq.next_id()
    }

    pub fn on_armed(&mut self, id: TimerId, cancel: CancellationToken) {
        self.active = Some(id);
        self.cancel = Some(cancel);
    }

    /// Clears the timer if `id` is the current arming. Returns whether it was.
    pub fn finish_if_active(&mut self, id: TimerId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    /// Disarms the timer, handing back its token so the caller can cancel it.
    pub fn take(&mut self) -> Option<CancellationToken> {
        self.active = None;
        self.cancel.take()
    }

    /// Disarms and cancels in one step.
    pub fn clear(&mut self) {
        if let Some(cancel) = self.take() {
            cancel.cancel();
        }
    }
}
