//! Debounce state machine
//!
//! A candidate value is held until it has stayed unchanged for the
//! configured window, then promoted to the committed value. Repeated
//! samples of the same candidate let the hold keep aging; only a
//! *different* sample restarts it, so steady noise on one level cannot
//! lock the input out forever.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::time::{Clock, Duration, Instant};

/// A pending candidate value and when it was first seen.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Hold {
    value: bool,
    since: Instant,
}

/// Single-context debounce state machine.
///
/// This is the pure logic: the caller supplies every timestamp, and
/// nothing here touches hardware or interrupts. Use it directly when
/// sampling and committing happen in the same execution context (see
/// [`DebouncedInput`](crate::input::DebouncedInput)), or wrap it in a
/// [`DebouncedChannel`] when an interrupt handler feeds the samples.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    timeout: Duration,
    committed: bool,
    hold: Option<Hold>,
}

impl Debouncer {
    /// Create a debouncer reporting `initial` until the first commit.
    pub const fn new(initial: bool, timeout: Duration) -> Self {
        Self {
            timeout,
            committed: initial,
            hold: None,
        }
    }

    /// Feed one raw sample taken at `now`.
    ///
    /// Starts a hold if none is pending, restarts it if the sample
    /// disagrees with the held candidate, and otherwise leaves the
    /// hold aging toward commit.
    pub fn sample(&mut self, raw: bool, now: Instant) {
        match self.hold {
            Some(hold) if hold.value == raw => {}
            _ => {
                self.hold = Some(Hold {
                    value: raw,
                    since: now,
                })
            }
        }
    }

    /// Commit the held candidate if it has been stable long enough.
    ///
    /// Returns `Some(new_value)` only when the committed value actually
    /// changed; a commit that re-confirms the current value is silent.
    pub fn tick(&mut self, now: Instant) -> Option<bool> {
        let hold = self.hold?;
        if now - hold.since < self.timeout {
            return None;
        }
        self.hold = None;
        let changed = hold.value != self.committed;
        self.committed = hold.value;
        changed.then_some(hold.value)
    }

    /// The stable, debounced value.
    ///
    /// May lag the physical signal by up to the debounce window.
    pub fn value(&self) -> bool {
        self.committed
    }

    /// True while a candidate is pending confirmation.
    pub fn is_settling(&self) -> bool {
        self.hold.is_some()
    }

    /// The configured debounce window.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A debounced input shared between interrupt and polling contexts.
///
/// Every operation takes `&self`, so one instance can live in a
/// `static` and be reached from both contexts: the pin's interrupt
/// handler calls [`sample`](Self::sample), the main loop calls
/// [`tick`](Self::tick) and [`value`](Self::value). Each operation
/// takes the state for exactly one short critical section, and `tick`
/// reports a committed change only once its section has ended, so
/// whatever the caller does in response runs with interrupts live and
/// never holds off sampling.
pub struct DebouncedChannel<C> {
    state: Mutex<CriticalSectionRawMutex, RefCell<Debouncer>>,
    clock: C,
}

impl<C> DebouncedChannel<C>
where
    C: Clock,
{
    pub const fn new(initial: bool, timeout: Duration, clock: C) -> Self {
        Self {
            state: Mutex::new(RefCell::new(Debouncer::new(initial, timeout))),
            clock,
        }
    }

    /// Feed one raw sample. Safe from interrupt context.
    pub fn sample(&self, raw: bool) {
        let now = self.clock.now();
        self.state.lock(|state| state.borrow_mut().sample(raw, now));
    }

    /// Commit a settled candidate.
    ///
    /// Call periodically from the (single) polling context. Returns
    /// `Some(new_value)` once per committed transition; by the time
    /// the caller sees it the critical section is over.
    pub fn tick(&self) -> Option<bool> {
        let now = self.clock.now();
        self.state.lock(|state| state.borrow_mut().tick(now))
    }

    /// [`tick`](Self::tick), firing `on_change` on a committed
    /// transition. The callback runs outside the critical section.
    pub fn tick_with<F: FnOnce(bool)>(&self, on_change: F) {
        if let Some(value) = self.tick() {
            on_change(value);
        }
    }

    /// The stable, debounced value.
    pub fn value(&self) -> bool {
        self.state.lock(|state| state.borrow().value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TIMEOUT: Duration = Duration::from_millis(10);

    fn at(ms: u32) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_commit_after_timeout() {
        let mut d = Debouncer::new(false, TIMEOUT);
        d.sample(true, at(0));

        assert_eq!(d.tick(at(5)), None);
        assert!(!d.value());
        assert!(d.is_settling());

        assert_eq!(d.tick(at(11)), Some(true));
        assert!(d.value());
        assert!(!d.is_settling());
    }

    #[test]
    fn test_bounce_restarts_hold() {
        let mut d = Debouncer::new(false, TIMEOUT);
        // Contact bounce: the level flips every few milliseconds.
        d.sample(true, at(0));
        d.sample(false, at(4));
        d.sample(true, at(8));

        // 10ms after the first sample, but only 3ms after the last
        // change: nothing commits.
        assert_eq!(d.tick(at(11)), None);
        assert!(!d.value());

        // 10ms after the last change it does.
        assert_eq!(d.tick(at(18)), Some(true));
        assert!(d.value());
    }

    #[test]
    fn test_identical_samples_do_not_restart_hold() {
        let mut d = Debouncer::new(false, TIMEOUT);
        d.sample(true, at(0));
        // Repeated confirmations of the same candidate must not push
        // the commit point out.
        d.sample(true, at(3));
        d.sample(true, at(6));
        d.sample(true, at(9));

        assert_eq!(d.tick(at(10)), Some(true));
    }

    #[test]
    fn test_noop_commit_is_silent() {
        let mut d = Debouncer::new(false, TIMEOUT);
        // A blip back to the current value settles without a report.
        d.sample(false, at(0));
        assert_eq!(d.tick(at(20)), None);
        assert!(!d.value());
        assert!(!d.is_settling());
    }

    #[test]
    fn test_tick_without_hold_is_noop() {
        let mut d = Debouncer::new(true, TIMEOUT);
        assert_eq!(d.tick(at(100)), None);
        assert!(d.value());
    }

    #[test]
    fn test_commit_across_counter_wraparound() {
        let mut d = Debouncer::new(false, TIMEOUT);
        d.sample(true, at(u32::MAX - 3));
        assert_eq!(d.tick(at(u32::MAX)), None);
        assert_eq!(d.tick(at(7)), Some(true));
    }

    #[test]
    fn test_one_report_per_transition() {
        let mut d = Debouncer::new(false, TIMEOUT);
        d.sample(true, at(0));
        assert_eq!(d.tick(at(10)), Some(true));
        // Further ticks with no new samples stay quiet.
        assert_eq!(d.tick(at(20)), None);
        assert_eq!(d.tick(at(30)), None);
    }

    /// Settable test clock; the channel holds it by reference.
    struct StepClock(core::cell::Cell<u32>);

    impl Clock for StepClock {
        fn now(&self) -> Instant {
            Instant::from_millis(self.0.get())
        }
    }

    #[test]
    fn test_channel_reports_transition_once() {
        // Links the host critical-section implementation into the test
        // binary for the CriticalSectionRawMutex inside the channel.
        use critical_section as _;

        let clock = StepClock(core::cell::Cell::new(0));
        let ch = DebouncedChannel::new(false, TIMEOUT, &clock);

        ch.sample(true);
        assert_eq!(ch.tick(), None); // same instant, window not elapsed
        assert!(!ch.value());

        clock.0.set(11);
        assert_eq!(ch.tick(), Some(true));
        assert!(ch.value());
        assert_eq!(ch.tick(), None);
    }

    #[test]
    fn test_channel_shared_across_handles() {
        use critical_section as _;

        let clock = StepClock(core::cell::Cell::new(0));
        let ch = DebouncedChannel::new(false, TIMEOUT, &clock);

        // The interrupt side holds its own shared reference for the
        // whole scenario while the polling side ticks through another.
        let isr = &ch;
        let main = &ch;

        let mut reported = None;
        isr.sample(true);
        main.tick_with(|v| reported = Some(v));
        assert_eq!(reported, None);

        clock.0.set(11);
        isr.sample(true); // identical sample, hold keeps aging
        main.tick_with(|v| reported = Some(v));
        assert_eq!(reported, Some(true));
        assert!(main.value());
    }

    #[test]
    fn test_channel_can_live_in_a_static() {
        use critical_section as _;

        struct ZeroClock;

        impl Clock for ZeroClock {
            fn now(&self) -> Instant {
                Instant::from_millis(0)
            }
        }

        // A static is the real two-context embedding; placing the
        // channel in one requires `Sync` and a const constructor.
        static CHANNEL: DebouncedChannel<ZeroClock> =
            DebouncedChannel::new(false, TIMEOUT, ZeroClock);

        CHANNEL.sample(true);
        assert_eq!(CHANNEL.tick(), None);
        assert!(!CHANNEL.value());
    }

    proptest! {
        /// Samples spaced closer together than the window, alternating
        /// value, never commit no matter how many ticks interleave.
        #[test]
        fn prop_never_commits_while_bouncing(gaps in prop::collection::vec(1u32..10, 1..50)) {
            let mut d = Debouncer::new(false, TIMEOUT);
            let mut now = 0u32;
            let mut level = true;
            for gap in gaps {
                d.sample(level, at(now));
                now += gap; // < TIMEOUT between changes
                prop_assert_eq!(d.tick(at(now)), None);
                prop_assert!(!d.value());
                level = !level;
            }
        }

        /// Once the signal goes quiet, one tick past the window commits
        /// the last sampled value.
        #[test]
        fn prop_commits_last_value_after_quiet(level: bool, start in 0u32..1000, extra in 0u32..100) {
            let mut d = Debouncer::new(!level, TIMEOUT);
            d.sample(level, at(start));
            let report = d.tick(at(start + TIMEOUT.as_millis() + extra));
            prop_assert_eq!(report, Some(level));
            prop_assert_eq!(d.value(), level);
        }
    }
}
