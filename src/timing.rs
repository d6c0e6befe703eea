use crate::{clock::Microseconds, error::ConfigError};

/// Timing budget of one read, in the units of the DHT11 datasheet.
///
/// The two known platform tunings differ only in how long the decoder waits
/// for the acknowledgment high phase to end: [`Timing::strict`] allows the
/// nominal 100 µs, [`Timing::relaxed`] (the default) allows 5 ms for targets
/// whose polling loop is slow.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// How long the MCU holds the line low to request a reading.
    pub reset_hold_ms: u32,
    /// Deadline for the whole acknowledgment low pulse.
    pub sync_low_timeout_us: u32,
    /// Shortest acknowledgment low pulse accepted as genuine.
    pub sync_low_min_us: u32,
    /// Deadline for the acknowledgment high phase to end.
    pub sync_high_timeout_us: u32,
    /// Deadline for each data bit.
    pub bit_timeout_us: u32,
    /// High pulses longer than this decode as `1`.
    pub one_threshold_us: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self::relaxed()
    }
}

impl Timing {
    const RESET_HOLD_RANGE_MS: core::ops::RangeInclusive<u32> = 18..=20;

    /// Generous acknowledgment deadline for slow polling loops.
    pub const fn relaxed() -> Self {
        Self {
            reset_hold_ms: 20,
            sync_low_timeout_us: 100,
            sync_low_min_us: 75,
            sync_high_timeout_us: 5_000,
            bit_timeout_us: 140,
            one_threshold_us: 60,
        }
    }

    /// Acknowledgment deadline close to the datasheet's 80 µs.
    pub const fn strict() -> Self {
        Self {
            reset_hold_ms: 18,
            sync_high_timeout_us: 100,
            ..Self::relaxed()
        }
    }

    /// Sets how long the start request holds the line low.
    pub const fn with_reset_hold_ms(mut self, ms: u32) -> Self {
        self.reset_hold_ms = ms;
        self
    }

    /// Sets the deadline for the acknowledgment high phase to end.
    pub const fn with_sync_high_timeout_us(mut self, us: u32) -> Self {
        self.sync_high_timeout_us = us;
        self
    }

    /// Checks the values a sensor would never answer to.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Self::RESET_HOLD_RANGE_MS.contains(&self.reset_hold_ms) {
            return Err(ConfigError::ResetHoldOutOfRange(self.reset_hold_ms));
        }
        if self.sync_low_min_us >= self.sync_low_timeout_us {
            return Err(ConfigError::SyncWindowInverted);
        }
        if self.sync_high_timeout_us == 0 || self.bit_timeout_us == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.bit_timeout_us <= self.one_threshold_us {
            return Err(ConfigError::BitWindowInverted);
        }
        Ok(())
    }

    pub(crate) const fn sync_low_timeout(&self) -> Microseconds {
        Microseconds(self.sync_low_timeout_us)
    }

    pub(crate) const fn sync_low_min(&self) -> Microseconds {
        Microseconds(self.sync_low_min_us)
    }

    pub(crate) const fn sync_high_timeout(&self) -> Microseconds {
        Microseconds(self.sync_high_timeout_us)
    }

    pub(crate) const fn bit_timeout(&self) -> Microseconds {
        Microseconds(self.bit_timeout_us)
    }

    pub(crate) const fn one_threshold(&self) -> Microseconds {
        Microseconds(self.one_threshold_us)
    }
}
