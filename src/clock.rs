//! Free-running microsecond clock built from a hardware counter and an
//! overflow count maintained by the counter's overflow interrupt.

use core::cell::Cell;

use critical_section::Mutex;

use crate::error::ConfigError;

/// A number of microseconds.
///
/// Instants wrap at `u32::MAX`; durations between two instants taken within a
/// single read are computed with wrapping subtraction.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Microseconds(pub u32);

impl Microseconds {
    /// Zero width. Also the "timed out" value returned by pulse measurement.
    pub const ZERO: Self = Self(0);

    /// Returns the contained number of microseconds.
    pub const fn as_micros(self) -> u32 {
        self.0
    }

    /// Returns `true` for a zero duration.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Time elapsed from `earlier` to `self`, tolerating one wrap of the
    /// underlying counter.
    pub const fn since(self, earlier: Self) -> Self {
        Self(self.0.wrapping_sub(earlier.0))
    }
}

/// A monotonic clock with microsecond resolution.
pub trait MonotonicClock {
    /// Returns the current instant. Successive calls never go backwards
    /// (modulo wrapping of the `u32` representation).
    fn now(&self) -> Microseconds;
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    fn now(&self) -> Microseconds {
        (**self).now()
    }
}

/// Read access to a free-running hardware timer.
///
/// Implemented once per platform, e.g. over `TCNT2`/`TIFR2` on an AVR or
/// `TIMx->CNT`/`TIMx->SR` on an STM32.
pub trait TimerCounter {
    /// Current value of the counter register.
    fn ticks(&self) -> u32;

    /// Whether the counter has wrapped but the overflow interrupt has not been
    /// serviced yet.
    fn overflow_pending(&self) -> bool;
}

/// How counter ticks convert to microseconds.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickScale {
    /// Each tick lasts this many microseconds.
    MicrosPerTick(u32),
    /// This many ticks make up one microsecond.
    TicksPerMicro(u32),
}

/// Counter width and tick rate of the timer behind an [`OverflowClock`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerConfig {
    period: u64,
    scale: TickScale,
}

impl TimerConfig {
    const MICROS_PER_SECOND: u32 = 1_000_000;

    /// Derives the configuration from the timer's input clock, its prescaler
    /// and the counter width in bits.
    ///
    /// An 8-bit timer on a 16 MHz AVR with a prescaler of 64 ticks every 4 µs:
    ///
    /// ```
    /// use dht11_sensor::{TickScale, TimerConfig};
    ///
    /// let config = TimerConfig::from_prescaler(16_000_000, 64, 8).unwrap();
    /// assert_eq!(config.period(), 256);
    /// assert_eq!(config.scale(), TickScale::MicrosPerTick(4));
    /// ```
    pub const fn from_prescaler(
        core_hz: u32,
        prescaler: u32,
        width_bits: u32,
    ) -> Result<Self, ConfigError> {
        if prescaler == 0 || prescaler > core_hz {
            return Err(ConfigError::InvalidPrescaler);
        }
        if width_bits == 0 || width_bits > 32 {
            return Err(ConfigError::InvalidCounterWidth(width_bits));
        }
        let tick_hz = core_hz / prescaler;
        let scale = if Self::MICROS_PER_SECOND % tick_hz == 0 {
            TickScale::MicrosPerTick(Self::MICROS_PER_SECOND / tick_hz)
        } else if tick_hz % Self::MICROS_PER_SECOND == 0 {
            TickScale::TicksPerMicro(tick_hz / Self::MICROS_PER_SECOND)
        } else {
            return Err(ConfigError::NonIntegralTickRate(tick_hz));
        };
        Ok(Self {
            period: 1 << width_bits,
            scale,
        })
    }

    /// Number of distinct counter values before it wraps.
    pub const fn period(&self) -> u64 {
        self.period
    }

    /// Tick to microsecond conversion.
    pub const fn scale(&self) -> TickScale {
        self.scale
    }

    fn micros_at(&self, overflows: u64, ticks: u32) -> Microseconds {
        let total = overflows
            .wrapping_mul(self.period)
            .wrapping_add(ticks as u64);
        let micros = match self.scale {
            TickScale::MicrosPerTick(us) => total.wrapping_mul(us as u64),
            TickScale::TicksPerMicro(per_micro) => total / per_micro as u64,
        };
        // Truncation wraps the clock at the u32 boundary.
        Microseconds(micros as u32)
    }
}

/// Monotonic microsecond clock made of a hardware counter plus an overflow
/// count.
///
/// The overflow count is advanced by [`OverflowClock::on_overflow`], which the
/// platform calls from the counter's overflow interrupt. [`MonotonicClock::now`]
/// reads the count and the counter register inside one critical section and
/// folds in an overflow that is flagged but not yet serviced, so a read taken
/// between the wrap and the interrupt does not appear to go back in time.
/// The count is 64 bits wide so the microsecond value only ever wraps at the
/// `u32` boundary, whatever the tick rate.
///
/// Meant to live in a `static` shared with the interrupt handler:
///
/// ```ignore
/// static CLOCK: OverflowClock<Timer2> = OverflowClock::new(Timer2, TIMER2_CONFIG);
///
/// #[interrupt]
/// fn TIMER2_OVF() {
///     CLOCK.on_overflow();
/// }
/// ```
pub struct OverflowClock<T> {
    timer: T,
    config: TimerConfig,
    overflows: Mutex<Cell<u64>>,
}

impl<T: TimerCounter> OverflowClock<T> {
    /// Creates a clock whose overflow count starts at zero.
    pub const fn new(timer: T, config: TimerConfig) -> Self {
        Self {
            timer,
            config,
            overflows: Mutex::new(Cell::new(0)),
        }
    }

    /// Records one counter wrap. Call exactly once per overflow interrupt.
    pub fn on_overflow(&self) {
        critical_section::with(|cs| {
            let overflows = self.overflows.borrow(cs);
            overflows.set(overflows.get().wrapping_add(1));
        });
    }

    /// Number of overflows serviced so far.
    pub fn overflow_count(&self) -> u64 {
        critical_section::with(|cs| self.overflows.borrow(cs).get())
    }

    /// Returns the timer configuration.
    pub const fn config(&self) -> &TimerConfig {
        &self.config
    }
}

impl<T: TimerCounter> MonotonicClock for OverflowClock<T> {
    fn now(&self) -> Microseconds {
        let (overflows, ticks) = critical_section::with(|cs| {
            let overflows = self.overflows.borrow(cs).get();
            let ticks = self.timer.ticks();
            if self.timer.overflow_pending() {
                // The wrap may have happened after `ticks` was sampled; a second
                // sample is guaranteed to be past it.
                (overflows.wrapping_add(1), self.timer.ticks())
            } else {
                (overflows, ticks)
            }
        });
        self.config.micros_at(overflows, ticks)
    }
}
