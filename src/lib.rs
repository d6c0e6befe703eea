//! DHT11 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic, bit-banged driver for the DHT11
//! temperature and humidity sensor. The sensor encodes its answer purely as
//! pulse widths on a single data line, so the driver times each pulse against a
//! microsecond clock while busy-polling the pin.
//!
//! # Features
//! - Blocking synchronous API, one bounded read attempt per call
//! - Designed for `no_std` environments
//! - Interrupt-safe microsecond clock built from any hardware timer with an
//!   overflow interrupt
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! The driver talks to the hardware through two small capabilities:
//! - [`GpioLine`], implemented directly or through [`OpenDrainLine`] for any
//!   [`InputPin`] + [`OutputPin`] with an infallible error
//! - [`MonotonicClock`], implemented by [`OverflowClock`] over a [`TimerCounter`]
//!
//! plus a [`DelayNs`] provider for the start request.
//!
//! # Example
//!
//! ```ignore
//! static CLOCK: OverflowClock<Timer2> = OverflowClock::new(Timer2, TIMER2_CONFIG);
//!
//! let mut dht = Dht11::new(OpenDrainLine::new(pin), &CLOCK, delay);
//! loop {
//!     match dht.get_reading() {
//!         Reading::Valid { temperature, humidity } => { /* ... */ }
//!         Reading::Failed { reason } => { /* ... */ }
//!     }
//!     // The sensor needs 2 seconds between samples.
//!     timer.delay_ms(2_000);
//! }
//! ```
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support and logs each
//!   failed read
//!
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod clock;
pub mod dht11;
pub mod error;
pub mod line;
pub mod pulse;
pub mod reading;
pub mod timing;

#[cfg(test)]
mod sim;

pub use clock::{
    Microseconds, MonotonicClock, OverflowClock, TickScale, TimerConfig, TimerCounter,
};
pub use dht11::Dht11;
pub use error::{ConfigError, DhtError};
pub use line::{GpioLine, OpenDrainLine};
pub use reading::{Measurement, RawFrame, Reading};
pub use timing::Timing;
