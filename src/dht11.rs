use embedded_hal::{delay::DelayNs, digital::PinState};

use crate::{
    clock::MonotonicClock,
    error::{ConfigError, DhtError},
    line::GpioLine,
    pulse::{measure_pulse, wait_for_level},
    reading::{FRAME_BITS, Measurement, RawFrame, Reading},
    timing::Timing,
};

/// Driver for the DHT11 temperature and humidity sensor.
pub struct Dht11<L, C, D> {
    line: L,
    clock: C,
    delay: D,
    timing: Timing,
}

impl<L, C, D> Dht11<L, C, D>
where
    L: GpioLine,
    C: MonotonicClock,
    D: DelayNs,
{
    /// Creates a new instance of the DHT11 driver with the default [`Timing`].
    ///
    /// # Arguments
    ///
    /// * `line` - The data line the sensor is connected to.
    /// * `clock` - A microsecond clock used to time the sensor's pulses.
    /// * `delay` - A delay provider for the start request.
    pub fn new(line: L, clock: C, delay: D) -> Self {
        Dht11 {
            line,
            clock,
            delay,
            timing: Timing::default(),
        }
    }

    /// Creates a driver with a custom [`Timing`], rejecting values the sensor
    /// would never answer to.
    pub fn with_timing(line: L, clock: C, delay: D, timing: Timing) -> Result<Self, ConfigError> {
        timing.validate()?;
        Ok(Dht11 {
            line,
            clock,
            delay,
            timing,
        })
    }

    /// Returns the timing in use.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Releases the line, clock and delay provider.
    pub fn release(self) -> (L, C, D) {
        (self.line, self.clock, self.delay)
    }

    /// Performs one read attempt and reports its outcome.
    ///
    /// Blocks for roughly the reset hold plus at most a few milliseconds.
    /// Consecutive calls must be at least 2 seconds apart; the driver does not
    /// enforce this.
    pub fn get_reading(&mut self) -> Reading {
        self.read().into()
    }

    /// Reads a temperature and humidity measurement from the DHT11 sensor.
    ///
    /// This method performs the complete DHT11 communication sequence:
    /// sending the start request, timing the sensor's acknowledgment,
    /// receiving 40 bits, validating the checksum, and decoding the result.
    /// The first failing stage ends the attempt; no retries are made.
    pub fn read(&mut self) -> Result<Measurement, DhtError> {
        self.start().inspect_err(|err| warn!("dht11 handshake failed: {}", err))?;
        let frame = self
            .receive_frame()
            .inspect_err(|err| warn!("dht11 transmission failed: {}", err))?;
        trace!("dht11 frame: {}", frame);

        frame
            .decode()
            .inspect_err(|err| warn!("dht11 frame rejected: {}", err))
    }

    /// Sends the start request and waits through the sensor's acknowledgment.
    ///
    /// The line is held low for the reset period, then released to the
    /// pull-up. The sensor answers with a ~80 µs low pulse, which must be at
    /// least `sync_low_min_us` long, followed by a ~80 µs high phase whose end
    /// marks the start of the first bit.
    fn start(&mut self) -> Result<(), DhtError> {
        // MCU sends start request
        self.line.set_output_low();
        self.delay.delay_ms(self.timing.reset_hold_ms);
        self.line.set_input_pullup();

        let ack = measure_pulse(
            &mut self.line,
            &self.clock,
            PinState::Low,
            self.timing.sync_low_timeout(),
        );
        debug!("dht11 ack low pulse: {} us", ack.as_micros());
        if ack < self.timing.sync_low_min() {
            return Err(DhtError::SyncTimeout1);
        }

        if !wait_for_level(
            &mut self.line,
            &self.clock,
            PinState::Low,
            self.timing.sync_high_timeout(),
            None,
        ) {
            return Err(DhtError::SyncTimeout2);
        }
        Ok(())
    }

    /// Receives the 40 data bits.
    ///
    /// Each bit is a ~50 µs low followed by a high pulse of ~26 µs for a `0`
    /// or ~70 µs for a `1`.
    fn receive_frame(&mut self) -> Result<RawFrame, DhtError> {
        let mut frame = RawFrame::default();

        for bit in 0..FRAME_BITS {
            let width = measure_pulse(
                &mut self.line,
                &self.clock,
                PinState::High,
                self.timing.bit_timeout(),
            );
            if width.is_zero() {
                return Err(DhtError::DataTimeout { bit: bit as u8 });
            }
            if width > self.timing.one_threshold() {
                frame.set_bit(bit);
            }
        }

        Ok(frame)
    }
}
