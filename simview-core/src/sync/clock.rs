use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Milliseconds since an arbitrary, clock-specific origin.
pub type Millis = u64;

pub trait Clock {
    fn now_ms(&self) -> Millis;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Manually advanced clock. Clones share the same time, so a test can hold
/// one handle while the components under test hold others.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<Millis>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now: Millis) -> Self {
        let clock = Self::new();
        clock.set(now);
        clock
    }

    pub fn advance(&self, delta: Millis) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    /// Moving backwards is ignored; monotonic time is assumed everywhere.
    pub fn set(&self, now: Millis) {
        if now >= self.now.get() {
            self.now.set(now);
        }
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_clock_clones_share_time() {
        let clock = VirtualClock::new();
        let other = clock.clone();
        clock.advance(150);
        assert_eq!(other.now_ms(), 150);
        other.set(100);
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = clock.now_ms();
        assert!(second >= first + 5);
        assert!(Rc::new(clock).now_ms() >= second);
    }
}
