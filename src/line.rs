//! The single data line shared by the MCU and the sensor.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// A GPIO pin that can either drive the data line low or release it to a
/// pull-up and read it back.
///
/// None of the operations can fail; a platform implements this once over its
/// own pin registers or HAL types.
pub trait GpioLine {
    /// Configures the pin as a driven output and pulls the line low.
    fn set_output_low(&mut self);

    /// Configures the pin as an input with its pull-up enabled.
    fn set_input_pullup(&mut self);

    /// Samples the current logic level.
    fn read(&mut self) -> PinState;
}

impl<L: GpioLine + ?Sized> GpioLine for &mut L {
    fn set_output_low(&mut self) {
        (**self).set_output_low();
    }

    fn set_input_pullup(&mut self) {
        (**self).set_input_pullup();
    }

    fn read(&mut self) -> PinState {
        (**self).read()
    }
}

/// [`GpioLine`] over an `embedded-hal` pin configured as open-drain output
/// with a pull-up (internal or external).
///
/// Writing low drives the line; writing high releases it so the sensor can
/// pull it down. Most HALs expose such pins with an [`Infallible`] error type.
pub struct OpenDrainLine<P> {
    pin: P,
}

impl<P> OpenDrainLine<P>
where
    P: InputPin<Error = Infallible> + OutputPin<Error = Infallible>,
{
    /// Wraps the pin and releases the line to its idle high level.
    pub fn new(mut pin: P) -> Self {
        let Ok(()) = pin.set_high();
        Self { pin }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> GpioLine for OpenDrainLine<P>
where
    P: InputPin<Error = Infallible> + OutputPin<Error = Infallible>,
{
    fn set_output_low(&mut self) {
        let Ok(()) = self.pin.set_low();
    }

    fn set_input_pullup(&mut self) {
        let Ok(()) = self.pin.set_high();
    }

    fn read(&mut self) -> PinState {
        let Ok(high) = self.pin.is_high();
        PinState::from(high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    /// Open-drain pin whose input level is the wired-AND of our output and the
    /// sensor's.
    struct WiredPin {
        driving_low: bool,
        sensor_low: bool,
        writes: Vec<PinState>,
    }

    impl ErrorType for WiredPin {
        type Error = Infallible;
    }

    impl OutputPin for WiredPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.driving_low = true;
            self.writes.push(PinState::Low);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.driving_low = false;
            self.writes.push(PinState::High);
            Ok(())
        }
    }

    impl InputPin for WiredPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.driving_low && !self.sensor_low)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.driving_low || self.sensor_low)
        }
    }

    fn wired_pin() -> WiredPin {
        WiredPin {
            driving_low: true,
            sensor_low: false,
            writes: vec![],
        }
    }

    #[test]
    fn test_new_releases_line() {
        let mut line = OpenDrainLine::new(wired_pin());
        assert_eq!(line.read(), PinState::High);
        assert_eq!(line.into_inner().writes, vec![PinState::High]);
    }

    #[test]
    fn test_drive_and_release() {
        let mut line = OpenDrainLine::new(wired_pin());

        line.set_output_low();
        assert_eq!(line.read(), PinState::Low);

        line.set_input_pullup();
        assert_eq!(line.read(), PinState::High);

        line.pin.sensor_low = true;
        assert_eq!(line.read(), PinState::Low);

        assert_eq!(
            line.into_inner().writes,
            vec![PinState::High, PinState::Low, PinState::High]
        );
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut line = OpenDrainLine::new(wired_pin());
        {
            let mut borrowed = &mut line;
            borrowed.set_output_low();
            assert_eq!(GpioLine::read(&mut borrowed), PinState::Low);
        }
        line.set_input_pullup();
        assert_eq!(line.read(), PinState::High);
    }
}
