//! Board-agnostic UI primitives for small-display firmware
//!
//! This crate contains the logic that does not depend on specific
//! hardware implementations:
//!
//! - Wrap-tolerant millisecond timekeeping (`Instant`, `Duration`, `Clock`)
//! - Debounced binary inputs, interrupt-fed or polled (`input`)
//! - The paged monochrome display protocol and a scrolling text
//!   console built on it (`display`)
//!
//! Hardware bindings (I2C transfers, fonts, device init) live in driver
//! crates such as `glint-sh1106`.

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod input;
pub mod time;

pub use display::{Console, GlyphSource, PagedDisplay, TextStyle};
pub use input::{DebouncedChannel, DebouncedInput, Debouncer, RawSignal};
pub use time::{Clock, Duration, Instant};
