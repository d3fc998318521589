use super::{GpioPin, LogicLevel};
use crate::{DapTransport, Error, ProbeSession};

/// A probe pin in GPIO input mode.
///
/// Created by [`ProbeSession::input_pin`]. It holds the session mutably, so only
/// one pin can be driven through `embedded-hal` at a time.
pub struct Input<'s, T: DapTransport> {
    session: &'s mut ProbeSession<T>,
    pin: GpioPin,
}

impl<'s, T: DapTransport> Input<'s, T> {
    pub(crate) fn new(session: &'s mut ProbeSession<T>, pin: GpioPin) -> Self {
        Self { session, pin }
    }

    /// The underlying pin.
    pub fn pin(&self) -> GpioPin {
        self.pin
    }

    /// Get the input level of this pin.
    pub fn get_level(&mut self) -> Result<LogicLevel, Error> {
        self.session.gpio_read(self.pin)
    }
}

impl<T: DapTransport> embedded_hal::digital::ErrorType for Input<'_, T> {
    type Error = Error;
}

impl<T: DapTransport> embedded_hal::digital::InputPin for Input<'_, T> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.get_level().map(LogicLevel::is_high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.get_level().map(LogicLevel::is_low)
    }
}

/// A probe pin in GPIO output mode.
///
/// Created by [`ProbeSession::output_pin`].
pub struct Output<'s, T: DapTransport> {
    session: &'s mut ProbeSession<T>,
    pin: GpioPin,
}

impl<'s, T: DapTransport> Output<'s, T> {
    pub(crate) fn new(session: &'s mut ProbeSession<T>, pin: GpioPin) -> Self {
        Self { session, pin }
    }

    /// The underlying pin.
    pub fn pin(&self) -> GpioPin {
        self.pin
    }

    /// Set the output level of this pin.
    pub fn set_level(&mut self, level: LogicLevel) -> Result<(), Error> {
        self.session.gpio_set_level(self.pin, level)
    }
}

impl<T: DapTransport> embedded_hal::digital::ErrorType for Output<'_, T> {
    type Error = Error;
}

impl<T: DapTransport> embedded_hal::digital::OutputPin for Output<'_, T> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_level(LogicLevel::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_level(LogicLevel::High)
    }
}
