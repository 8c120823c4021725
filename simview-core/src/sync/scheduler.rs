use crate::sync::clock::{Clock, Millis};
use std::collections::HashMap;

/// Identifies one scheduled task. Handles are never reused by a scheduler,
/// so a stale handle cannot cancel somebody else's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: Millis,
    period: Option<Millis>,
}

/// Deferred work for a single-threaded event loop.
///
/// The scheduler never runs anything itself. Owners call [`Scheduler::poll`]
/// from their event loop (or a test advancing a virtual clock) and dispatch on
/// the returned handles.
#[derive(Debug)]
pub struct Scheduler<C: Clock> {
    clock: C,
    next_id: u64,
    timers: HashMap<TimerHandle, Timer>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            timers: HashMap::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn schedule_once(&mut self, delay: Millis) -> TimerHandle {
        let due = self.now().saturating_add(delay);
        self.insert(Timer { due, period: None })
    }

    pub fn schedule_at(&mut self, due: Millis) -> TimerHandle {
        self.insert(Timer { due, period: None })
    }

    /// Zero periods are bumped to 1 ms so a repeating timer cannot fire
    /// on every poll.
    pub fn schedule_repeating(&mut self, period: Millis) -> TimerHandle {
        let period = period.max(1);
        let due = self.now().saturating_add(period);
        self.insert(Timer {
            due,
            period: Some(period),
        })
    }

    fn insert(&mut self, timer: Timer) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.insert(handle, timer);
        log::debug!("timer {:?} armed for t={}ms", handle, timer.due);
        handle
    }

    /// Returns whether the handle was still active.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    pub fn due_at(&self, handle: TimerHandle) -> Option<Millis> {
        self.timers.get(&handle).map(|timer| timer.due)
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.timers.values().map(|timer| timer.due).min()
    }

    /// Fires every timer due at the current time, ordered by due time and
    /// then by creation. One-shot timers are removed; repeating timers are
    /// re-armed one period after now, so a stalled loop sees a single tick
    /// rather than a burst.
    pub fn poll(&mut self) -> Vec<TimerHandle> {
        let now = self.now();
        let mut due: Vec<(Millis, TimerHandle)> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= now)
            .map(|(handle, timer)| (timer.due, *handle))
            .collect();
        due.sort_unstable();

        let mut fired = Vec::with_capacity(due.len());
        for (_, handle) in due {
            let Some(timer) = self.timers.get_mut(&handle) else {
                continue;
            };
            match timer.period {
                Some(period) => timer.due = now.saturating_add(period),
                None => {
                    self.timers.remove(&handle);
                }
            }
            fired.push(handle);
        }
        fired
    }
}
