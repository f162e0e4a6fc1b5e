//! Wrap-tolerant millisecond timekeeping
//!
//! Monotonic counters on small targets are fixed-width and wrap. All
//! elapsed-time math here goes through `wrapping_sub` on the counter
//! width, so a reading taken just before wraparound still yields a
//! small positive duration against one taken just after.

/// A reading of a monotonic millisecond counter.
///
/// Wraps at `u32::MAX` milliseconds (about 49.7 days).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u32);

impl Instant {
    /// Create an instant from a raw millisecond counter value.
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Raw counter value in milliseconds.
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Time elapsed since an earlier reading of the same counter.
    pub const fn since(self, earlier: Instant) -> Duration {
        Duration(self.0.wrapping_sub(earlier.0))
    }
}

impl core::ops::Sub for Instant {
    type Output = Duration;

    fn sub(self, earlier: Self) -> Duration {
        self.since(earlier)
    }
}

impl core::ops::Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, d: Duration) -> Instant {
        Instant(self.0.wrapping_add(d.0))
    }
}

/// A span between two [`Instant`]s, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Duration(u32);

impl Duration {
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    pub const fn from_secs(s: u32) -> Self {
        Self(s * 1000)
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }
}

/// Source of monotonic time.
///
/// Implementations read whatever free-running counter the platform
/// provides. `now()` must be callable from interrupt context, so it
/// has to be an atomic read of the counter, not a read-modify cycle.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock> Clock for &C {
    fn now(&self) -> Instant {
        (*self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_simple() {
        let a = Instant::from_millis(100);
        let b = Instant::from_millis(150);
        assert_eq!(b - a, Duration::from_millis(50));
    }

    #[test]
    fn test_elapsed_across_wraparound() {
        let before = Instant::from_millis(u32::MAX - 4);
        let after = Instant::from_millis(5);
        assert_eq!(after - before, Duration::from_millis(10));
    }

    #[test]
    fn test_add_wraps() {
        let t = Instant::from_millis(u32::MAX) + Duration::from_millis(1);
        assert_eq!(t.as_millis(), 0);
    }

    #[test]
    fn test_duration_ordering() {
        assert!(Duration::from_millis(999) < Duration::from_secs(1));
    }
}
