//! Logical timer queue for deferred transitions
//!
//! Delays are counted in simulation steps, never wall-clock time. Each event
//! belongs to a category and at most one event per category is pending:
//! scheduling a new one cancels the previous, so a stale "next pitch" can never
//! fire after a new pitch has already started.

use super::state::PlayOutcome;

/// Purpose of a delayed event (one pending event per category)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerCategory {
    /// Show the verdict of a finished play
    Announce,
    /// Start the next pitch
    Resume,
}

/// A deferred transition
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// Announce the result of a play (or game over if the inning is done)
    Announce(PlayOutcome),
    /// Reset for the next pitch
    ResetPitch,
}

impl TimerEvent {
    pub fn category(&self) -> TimerCategory {
        match self {
            TimerEvent::Announce(_) => TimerCategory::Announce,
            TimerEvent::ResetPitch => TimerCategory::Resume,
        }
    }
}

/// Handle returned by [`TimerQueue::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct PendingTimer {
    handle: TimerHandle,
    fire_at: u64,
    event: TimerEvent,
}

/// Pending delayed events, ordered by schedule time
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<PendingTimer>,
    next_handle: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire `delay` steps after `now`, cancelling any
    /// pending event of the same category
    pub fn schedule(&mut self, event: TimerEvent, now: u64, delay: u64) -> TimerHandle {
        let category = event.category();
        let before = self.pending.len();
        self.pending.retain(|t| t.event.category() != category);
        if self.pending.len() != before {
            log::debug!("Replaced pending {category:?} timer");
        }

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(PendingTimer {
            handle,
            fire_at: now + delay,
            event,
        });
        handle
    }

    /// Cancel a pending event. Returns false if it already fired or was replaced.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    /// Drop every pending event
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, category: TimerCategory) -> bool {
        self.pending.iter().any(|t| t.event.category() == category)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every event due at or before `now`, in schedule order
    pub fn take_due(&mut self, now: u64) -> Vec<TimerEvent> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].fire_at <= now {
                due.push(self.pending.remove(i).event);
            } else {
                i += 1;
            }
        }
        due
    }
}
