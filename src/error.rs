use core::fmt;

/// Reasons a single DHT11 read attempt can fail.
///
/// Every variant is recoverable: the caller is expected to log it and try again
/// after the sensor's minimum sampling interval.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DhtError {
    /// The sensor's acknowledgment low pulse was missing or shorter than the
    /// configured minimum.
    SyncTimeout1,
    /// The acknowledgment high phase did not end in time.
    SyncTimeout2,
    /// A data pulse did not arrive within its timeout.
    DataTimeout {
        /// Index (0..40) of the bit that was being received.
        bit: u8,
    },
    /// Checksum did not match the received data.
    ChecksumMismatch {
        /// Checksum byte transmitted by the sensor.
        expected: u8,
        /// Checksum computed from the four data bytes.
        actual: u8,
    },
    /// Uninitialized failure value. A completed read never produces this.
    #[default]
    Unknown,
}

impl fmt::Display for DhtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhtError::SyncTimeout1 => f.write_str("timed out on the first step of sync"),
            DhtError::SyncTimeout2 => f.write_str("timed out on the second step of sync"),
            DhtError::DataTimeout { bit } => {
                write!(f, "timed out while receiving data (bit {bit})")
            }
            DhtError::ChecksumMismatch { expected, actual } => write!(
                f,
                "checksum mismatch (expected {expected:#04x}, found {actual:#04x})"
            ),
            DhtError::Unknown => f.write_str("failed with unknown reason"),
        }
    }
}

impl core::error::Error for DhtError {}

/// Rejected clock or decoder configuration.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Prescaler of zero, or one larger than the core clock.
    InvalidPrescaler,
    /// Counter width outside 1..=32 bits.
    InvalidCounterWidth(u32),
    /// The tick rate is neither a divisor nor a multiple of 1 MHz.
    NonIntegralTickRate(u32),
    /// Reset hold outside the 18..=20 ms window.
    ResetHoldOutOfRange(u32),
    /// The acknowledgment minimum is not below its timeout.
    SyncWindowInverted,
    /// A stage deadline of zero, which no pulse can meet.
    ZeroTimeout,
    /// The bit deadline does not exceed the `1` threshold.
    BitWindowInverted,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPrescaler => f.write_str("invalid timer prescaler"),
            ConfigError::InvalidCounterWidth(bits) => {
                write!(f, "invalid counter width: {bits} bits")
            }
            ConfigError::NonIntegralTickRate(hz) => {
                write!(f, "tick rate {hz} Hz does not divide evenly into microseconds")
            }
            ConfigError::ResetHoldOutOfRange(ms) => {
                write!(f, "reset hold of {ms} ms is outside 18..=20 ms")
            }
            ConfigError::SyncWindowInverted => {
                f.write_str("acknowledgment minimum must be below its timeout")
            }
            ConfigError::ZeroTimeout => f.write_str("stage timeouts must be non-zero"),
            ConfigError::BitWindowInverted => {
                f.write_str("bit timeout must exceed the one threshold")
            }
        }
    }
}

impl core::error::Error for ConfigError {}
