use crate::error::SyncError;
use crate::sync::clock::{Clock, Millis};
use crate::sync::scheduler::{Scheduler, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The sink finished with the payload before returning.
    Delivered,
    /// The sink accepted the payload; the owner reports completion later
    /// through [`ThrottledSync::complete_send`].
    InFlight,
}

/// Destination of throttled payloads.
pub trait SyncSink<P> {
    fn send(&mut self, payload: &P) -> Result<SendOutcome, SyncError>;
}

impl<P, F> SyncSink<P> for F
where
    F: FnMut(&P) -> Result<SendOutcome, SyncError>,
{
    fn send(&mut self, payload: &P) -> Result<SendOutcome, SyncError> {
        self(payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    Idle,
    Pending,
    Sending,
}

/// Rate limiter that coalesces a burst of updates into one send of the
/// latest payload per interval.
///
/// The interval clock starts when the channel is created (and again on
/// `reset`), so the first burst after construction is also coalesced.
/// Sending through the sink happens inside `schedule`, `poll`, `flush` and
/// `complete_send`; the sink is passed in each time so the channel never
/// borrows its owner.
#[derive(Debug)]
pub struct ThrottledSync<P, C: Clock> {
    interval: Millis,
    scheduler: Scheduler<C>,
    deadline: Option<TimerHandle>,
    pending: Option<P>,
    in_flight: bool,
    last_sent: Millis,
    sends: u64,
}

impl<P, C: Clock> ThrottledSync<P, C> {
    pub fn new(interval: Millis, clock: C) -> Self {
        let scheduler = Scheduler::new(clock);
        let last_sent = scheduler.now();
        Self {
            interval,
            scheduler,
            deadline: None,
            pending: None,
            in_flight: false,
            last_sent,
            sends: 0,
        }
    }

    pub fn interval(&self) -> Millis {
        self.interval
    }

    pub fn state(&self) -> ThrottleState {
        if self.in_flight {
            ThrottleState::Sending
        } else if self.pending.is_some() {
            ThrottleState::Pending
        } else {
            ThrottleState::Idle
        }
    }

    pub fn pending(&self) -> Option<&P> {
        self.pending.as_ref()
    }

    pub fn send_count(&self) -> u64 {
        self.sends
    }

    /// When the deferred send is due, if one is armed.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.deadline.and_then(|handle| self.scheduler.due_at(handle))
    }

    /// Records `payload` as the latest state. Returns `true` when it went out
    /// immediately.
    pub fn schedule<S: SyncSink<P>>(&mut self, payload: P, sink: &mut S) -> Result<bool, SyncError> {
        if self.pending.replace(payload).is_some() {
            log::debug!("throttle: superseded pending payload");
        }
        if self.in_flight {
            return Ok(false);
        }
        if self.interval_elapsed() {
            self.send_pending(sink)
        } else {
            self.arm_deadline();
            Ok(false)
        }
    }

    /// Drives deferred sends. Call from the event loop whenever time passes.
    pub fn poll<S: SyncSink<P>>(&mut self, sink: &mut S) -> Result<bool, SyncError> {
        let fired = self.scheduler.poll();
        let Some(deadline) = self.deadline else {
            return Ok(false);
        };
        if !fired.contains(&deadline) {
            return Ok(false);
        }
        self.deadline = None;
        if self.in_flight {
            return Ok(false);
        }
        self.send_pending(sink)
    }

    /// Sends the pending payload now, whatever the interval state, and
    /// restarts the interval. No-op without a pending payload.
    pub fn flush<S: SyncSink<P>>(&mut self, sink: &mut S) -> Result<bool, SyncError> {
        if self.pending.is_none() {
            return Ok(false);
        }
        self.send_pending(sink)
    }

    /// Reports that an `InFlight` send finished. A payload scheduled in the
    /// meantime goes out now if the interval allows, otherwise at the next
    /// boundary.
    pub fn complete_send<S: SyncSink<P>>(&mut self, sink: &mut S) -> Result<bool, SyncError> {
        if !self.in_flight {
            return Ok(false);
        }
        self.in_flight = false;
        if self.pending.is_none() {
            return Ok(false);
        }
        if self.interval_elapsed() {
            self.send_pending(sink)
        } else {
            self.arm_deadline();
            Ok(false)
        }
    }

    /// Drops the pending payload and cancels the deferred send.
    pub fn reset(&mut self) {
        self.cancel_deadline();
        self.pending = None;
        self.in_flight = false;
        self.last_sent = self.scheduler.now();
    }

    fn interval_elapsed(&self) -> bool {
        self.scheduler.now() >= self.last_sent.saturating_add(self.interval)
    }

    fn arm_deadline(&mut self) {
        if self.deadline.is_none() {
            let due = self.last_sent.saturating_add(self.interval);
            self.deadline = Some(self.scheduler.schedule_at(due));
        }
    }

    fn cancel_deadline(&mut self) {
        if let Some(handle) = self.deadline.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn send_pending<S: SyncSink<P>>(&mut self, sink: &mut S) -> Result<bool, SyncError> {
        let Some(payload) = self.pending.take() else {
            return Ok(false);
        };
        self.cancel_deadline();
        self.last_sent = self.scheduler.now();
        match sink.send(&payload) {
            Ok(outcome) => {
                self.sends += 1;
                self.in_flight = outcome == SendOutcome::InFlight;
                Ok(true)
            }
            Err(err) => {
                log::warn!("throttled send failed, retrying next interval: {err}");
                if self.pending.is_none() {
                    self.pending = Some(payload);
                }
                self.arm_deadline();
                Err(err)
            }
        }
    }
}
