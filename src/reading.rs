use core::fmt;

use crate::error::DhtError;

/// Number of bytes in one sensor transmission.
pub const FRAME_BYTES: usize = 5;
/// Number of bits in one sensor transmission.
pub const FRAME_BITS: usize = FRAME_BYTES * 8;

/// Temperature and humidity decoded from a valid frame.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
}

/// Outcome of one read attempt.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reading {
    /// The frame arrived complete and passed its checksum.
    Valid {
        /// Temperature in degrees Celsius.
        temperature: f32,
        /// Relative humidity in percent.
        humidity: f32,
    },
    /// The attempt stopped at the given stage.
    Failed {
        /// Why the attempt failed.
        reason: DhtError,
    },
}

impl Reading {
    /// Returns `true` for [`Reading::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Reading::Valid { .. })
    }

    /// The measurement, if the read succeeded.
    pub fn measurement(&self) -> Option<Measurement> {
        match *self {
            Reading::Valid {
                temperature,
                humidity,
            } => Some(Measurement {
                temperature,
                humidity,
            }),
            Reading::Failed { .. } => None,
        }
    }

    /// The failure reason, if the read failed.
    pub fn failure(&self) -> Option<DhtError> {
        match *self {
            Reading::Valid { .. } => None,
            Reading::Failed { reason } => Some(reason),
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Reading::Failed {
            reason: DhtError::default(),
        }
    }
}

impl From<Result<Measurement, DhtError>> for Reading {
    fn from(result: Result<Measurement, DhtError>) -> Self {
        match result {
            Ok(Measurement {
                temperature,
                humidity,
            }) => Reading::Valid {
                temperature,
                humidity,
            },
            Err(reason) => Reading::Failed { reason },
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Valid {
                temperature,
                humidity,
            } => write!(f, "Sample OK: {temperature:.2} *C {humidity:.2} % H"),
            Reading::Failed { reason } => write!(f, "Read DHT11 failed: {reason}"),
        }
    }
}

/// The five raw bytes of one transmission:
/// `[humidity_int, humidity_frac, temp_int, temp_frac, checksum]`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_BYTES]);

impl RawFrame {
    /// Wraps five bytes in transmission order.
    pub const fn new(bytes: [u8; FRAME_BYTES]) -> Self {
        Self(bytes)
    }

    /// Returns the bytes in transmission order.
    pub const fn bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.0
    }

    /// Sets bit `index` (0..40), most significant bit of each byte first.
    pub(crate) fn set_bit(&mut self, index: usize) {
        self.0[index / 8] |= 1 << (7 - index % 8);
    }

    /// Low 8 bits of the sum of the four data bytes.
    pub fn checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
    }

    /// Whether the transmitted checksum byte matches the data.
    pub fn is_valid(&self) -> bool {
        self.checksum() == self.0[4]
    }

    /// Validates the checksum and decodes the measurement.
    pub fn decode(&self) -> Result<Measurement, DhtError> {
        let [hum_int, hum_frac, temp_int, temp_frac, expected] = self.0;
        let actual = self.checksum();
        if actual != expected {
            return Err(DhtError::ChecksumMismatch { expected, actual });
        }
        Ok(Measurement {
            temperature: temp_int as f32 + decimal_fraction(temp_frac),
            humidity: hum_int as f32 + decimal_fraction(hum_frac),
        })
    }
}

/// Reads the fractional byte as the digits after the decimal point:
/// 5 becomes 0.5, 25 becomes 0.25.
fn decimal_fraction(frac: u8) -> f32 {
    let mut f = frac as f32;
    while f >= 1.0 {
        f /= 10.0;
    }
    f
}
