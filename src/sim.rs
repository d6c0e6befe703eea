//! Host-side simulation of a DHT11 on the data line, driven by a virtual
//! microsecond clock.

use std::{cell::Cell, rc::Rc};

use embedded_hal::digital::PinState;

use crate::{
    clock::{Microseconds, MonotonicClock},
    line::GpioLine,
};

/// Low phase that precedes every data bit.
pub(crate) const BIT_LOW_US: u32 = 50;
/// Nominal high width of a `0` bit.
pub(crate) const ZERO_HIGH_US: u32 = 26;
/// Nominal high width of a `1` bit.
pub(crate) const ONE_HIGH_US: u32 = 70;
/// Delay between the MCU releasing the line and the sensor answering.
const RESPONSE_DELAY_US: u32 = 10;

/// Virtual clock. Every call to `now` advances time by one microsecond, so
/// each poll of a busy-wait loop costs one microsecond.
pub(crate) struct SimClock {
    time: Rc<Cell<u32>>,
    origin: u32,
}

impl SimClock {
    /// Microseconds consumed since the simulation started.
    pub(crate) fn elapsed(&self) -> u32 {
        self.time.get().wrapping_sub(self.origin)
    }
}

impl MonotonicClock for SimClock {
    fn now(&self) -> Microseconds {
        let now = self.time.get();
        self.time.set(now.wrapping_add(1));
        Microseconds(now)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LineEvent {
    DrivenLow(u32),
    Released(u32),
}

/// Data line whose level follows a pulse train, anchored at the moment the MCU
/// last released it. Idles high before and after the train.
pub(crate) struct SimLine {
    time: Rc<Cell<u32>>,
    train: Vec<(PinState, u32)>,
    driven_low: bool,
    released_at: Option<u32>,
    pub(crate) events: Vec<LineEvent>,
}

impl GpioLine for SimLine {
    fn set_output_low(&mut self) {
        self.driven_low = true;
        self.released_at = None;
        self.events.push(LineEvent::DrivenLow(self.time.get()));
    }

    fn set_input_pullup(&mut self) {
        self.driven_low = false;
        self.released_at = Some(self.time.get());
        self.events.push(LineEvent::Released(self.time.get()));
    }

    fn read(&mut self) -> PinState {
        if self.driven_low {
            return PinState::Low;
        }
        let Some(released_at) = self.released_at else {
            return PinState::High;
        };
        let mut offset = self.time.get().wrapping_sub(released_at);
        for &(level, width) in &self.train {
            if offset < width {
                return level;
            }
            offset -= width;
        }
        PinState::High
    }
}

/// Builder for the pulse train the simulated sensor emits after release.
pub(crate) struct Train {
    pulses: Vec<(PinState, u32)>,
    start: u32,
}

impl Train {
    pub(crate) fn new() -> Self {
        Self {
            pulses: Vec::new(),
            start: 1_000,
        }
    }

    /// Acknowledgment: a short idle high, then `low_us` low and `high_us` high.
    pub(crate) fn response(low_us: u32, high_us: u32) -> Self {
        Self::new()
            .hold(PinState::High, RESPONSE_DELAY_US)
            .hold(PinState::Low, low_us)
            .hold(PinState::High, high_us)
    }

    /// The nominal 80 µs low + 80 µs high acknowledgment.
    pub(crate) fn ack() -> Self {
        Self::response(80, 80)
    }

    pub(crate) fn hold(mut self, level: PinState, width_us: u32) -> Self {
        self.pulses.push((level, width_us));
        self
    }

    /// One data bit whose high phase lasts `high_us`.
    pub(crate) fn bit(self, high_us: u32) -> Self {
        self.hold(PinState::Low, BIT_LOW_US)
            .hold(PinState::High, high_us)
    }

    pub(crate) fn byte(self, byte: u8) -> Self {
        (0..8).fold(self, |train, i| {
            let one = (byte >> (7 - i)) & 1 == 1;
            train.bit(if one { ONE_HIGH_US } else { ZERO_HIGH_US })
        })
    }

    /// All bytes followed by the closing low pulse.
    pub(crate) fn frame(self, bytes: &[u8]) -> Self {
        bytes.iter().fold(self, |train, &b| train.byte(b)).end()
    }

    /// Closing low pulse after the last bit; the line then idles high.
    pub(crate) fn end(self) -> Self {
        self.hold(PinState::Low, BIT_LOW_US)
    }

    pub(crate) fn starting_at(mut self, time: u32) -> Self {
        self.start = time;
        self
    }

    /// Line and clock with the MCU not yet holding the line.
    pub(crate) fn build(self) -> (SimLine, SimClock) {
        let time = Rc::new(Cell::new(self.start));
        let line = SimLine {
            time: time.clone(),
            train: self.pulses,
            driven_low: false,
            released_at: None,
            events: Vec::new(),
        };
        let clock = SimClock {
            time,
            origin: self.start,
        };
        (line, clock)
    }

    /// Line and clock with the train already started.
    pub(crate) fn released(self) -> (SimLine, SimClock) {
        let (mut line, clock) = self.build();
        line.set_input_pullup();
        (line, clock)
    }
}
