use std::collections::{BTreeMap, HashMap};

use crate::particles::burst::BurstId;

/// Handle returned by [`Scheduler::schedule_after`]; pass it back to cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(pub u64);

/// Work item queued on the event loop.
///
/// Tasks are plain data: the loop hands them back to
/// [`Player::fire`](crate::Player::fire), which routes them to the owning component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTask {
    /// Next playback step. Only honored if `epoch` is still current.
    Playback { epoch: u64 },
    /// Next tick of one particle burst.
    Particles { burst: BurstId },
}

/// Cooperative timer port. Implementations never block the caller.
pub trait Scheduler {
    fn schedule_after(&mut self, delay_ms: u32, task: TimerTask) -> TimerToken;

    /// Cancelling an unknown or already-fired token is a no-op.
    fn cancel(&mut self, token: TimerToken);
}

/// Deterministic timer queue driven by explicit time advancement.
///
/// Timers fire in due-time order; timers due at the same instant fire in the
/// order they were scheduled.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now_ms: u64,
    next_token: u64,
    queue: BTreeMap<(u64, TimerToken), TimerTask>,
    due_by_token: HashMap<TimerToken, u64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerTask> {
        let (&(due, token), _) = self.queue.iter().next()?;
        if due > until_ms {
            return None;
        }
        let task = self.queue.remove(&(due, token))?;
        self.due_by_token.remove(&token);
        self.now_ms = self.now_ms.max(due);
        Some(task)
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn tasks(&self) -> impl Iterator<Item = (u64, TimerTask)> + '_ {
        self.queue.iter().map(|(&(due, _), &task)| (due, task))
    }
}

impl Scheduler for VirtualClock {
    fn schedule_after(&mut self, delay_ms: u32, task: TimerTask) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let due = self.now_ms.saturating_add(u64::from(delay_ms));
        self.queue.insert((due, token), task);
        self.due_by_token.insert(token, due);
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        if let Some(due) = self.due_by_token.remove(&token) {
            self.queue.remove(&(due, token));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
