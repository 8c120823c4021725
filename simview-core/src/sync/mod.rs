//! Deferred work for the single-threaded GUI model: clocks, cancellable
//! timers, and the coalescing throttle built on them.

pub mod clock;
pub mod scheduler;
pub mod throttle;

pub use clock::{Clock, Millis, SystemClock, VirtualClock};
pub use scheduler::{Scheduler, TimerHandle};
pub use throttle::{SendOutcome, SyncSink, ThrottleState, ThrottledSync};
