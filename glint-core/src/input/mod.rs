//! Debounced binary inputs
//!
//! A raw pin level bounces for a few milliseconds around every edge.
//! The [`Debouncer`] turns those noisy samples into a stable logical
//! value; [`DebouncedChannel`] shares one across the interrupt and
//! polling contexts, and [`DebouncedInput`] bundles debouncer plus
//! signal source for plain polling call sites.

mod adapter;
mod debounce;

pub use adapter::DebouncedInput;
pub use debounce::{DebouncedChannel, Debouncer};

/// An instantaneous binary signal source, typically a GPIO pin.
///
/// No debouncing, no edge detection; `read()` reports the level right
/// now, from whichever context the caller runs in.
pub trait RawSignal {
    fn read(&mut self) -> bool;
}

impl<S: RawSignal> RawSignal for &mut S {
    fn read(&mut self) -> bool {
        (*self).read()
    }
}
