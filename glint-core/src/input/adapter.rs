//! Polled debounced input
//!
//! For call sites that just poll a pin and want a clean level back.
//! Sampling only happens when `read()` does, so the asynchronous
//! interrupt-fed path of [`DebouncedChannel`] is traded away for a
//! one-liner at the call site.
//!
//! [`DebouncedChannel`]: crate::input::DebouncedChannel

use crate::input::{Debouncer, RawSignal};
use crate::time::{Clock, Duration};

/// A signal source coupled to its own debouncer.
///
/// Everything runs in the caller's context, so no critical section is
/// involved; the debouncer is borrowed exclusively per call.
pub struct DebouncedInput<S, C> {
    source: S,
    clock: C,
    debouncer: Debouncer,
}

impl<S, C> DebouncedInput<S, C>
where
    S: RawSignal,
    C: Clock,
{
    pub fn new(source: S, clock: C, initial: bool, timeout: Duration) -> Self {
        Self {
            source,
            clock,
            debouncer: Debouncer::new(initial, timeout),
        }
    }

    /// Sample the raw source, run one debounce step, and return the
    /// debounced value.
    pub fn read(&mut self) -> bool {
        let raw = self.source.read();
        let now = self.clock.now();
        self.debouncer.sample(raw, now);
        let _ = self.debouncer.tick(now);
        self.debouncer.value()
    }

    /// The debounced value from the last `read()`, without sampling.
    pub fn value(&self) -> bool {
        self.debouncer.value()
    }
}
