use super::ProbeSession;
use crate::constants::DAP_OK;
use crate::gpio::{GpioDirection, GpioPin, Input, LogicLevel, Output};
use crate::{DapTransport, Error, VendorCommand};

impl<T: DapTransport> ProbeSession<T> {
    /// Read the logic level at a pin.
    ///
    /// For an output pin this is the level it is driving.
    pub fn gpio_read(&mut self, pin: GpioPin) -> Result<LogicLevel, Error> {
        let response =
            self.with_transport(|t| t.vendor_request(VendorCommand::ReadGpio, &[pin.number()]))?;
        let received = response.first().copied();
        received
            .and_then(|level| LogicLevel::try_from(level).ok())
            .ok_or(Error::ProtocolError {
                command: VendorCommand::ReadGpio,
                expected: "a level of 0 or 1",
                received,
            })
    }

    /// Make a pin an input or an output.
    pub fn gpio_set_direction(
        &mut self,
        pin: GpioPin,
        direction: GpioDirection,
    ) -> Result<(), Error> {
        self.gpio_set_direction_with_option(pin, direction, 0)
    }

    /// Make a pin an input or an output, passing a firmware-defined option
    /// byte along with the direction. The stock firmware expects 0.
    pub fn gpio_set_direction_with_option(
        &mut self,
        pin: GpioPin,
        direction: GpioDirection,
        option: u8,
    ) -> Result<(), Error> {
        self.gpio_command(
            VendorCommand::SetGpioDirection,
            &[pin.number(), direction.into(), option],
        )
    }

    /// Set the level an output pin drives.
    pub fn gpio_set_level(&mut self, pin: GpioPin, level: LogicLevel) -> Result<(), Error> {
        self.gpio_command(VendorCommand::SetGpioLevel, &[pin.number(), level.into()])
    }

    /// Send a pin update, which the probe acknowledges with a status byte.
    fn gpio_command(&mut self, command: VendorCommand, payload: &[u8]) -> Result<(), Error> {
        let response = self.with_transport(|t| t.vendor_request(command, payload))?;
        match response.first() {
            Some(&DAP_OK) => Ok(()),
            received => Err(Error::ProtocolError {
                command,
                expected: "status DAP_OK (0)",
                received: received.copied(),
            }),
        }
    }

    /// Configure `pin` as an input and borrow it as an [`embedded_hal`] input pin.
    pub fn input_pin(&mut self, pin: GpioPin) -> Result<Input<'_, T>, Error> {
        self.gpio_set_direction(pin, GpioDirection::Input)?;
        Ok(Input::new(self, pin))
    }

    /// Configure `pin` as an output driving `level` and borrow it as an
    /// [`embedded_hal`] output pin.
    pub fn output_pin(&mut self, pin: GpioPin, level: LogicLevel) -> Result<Output<'_, T>, Error> {
        self.gpio_set_direction(pin, GpioDirection::Output)?;
        self.gpio_set_level(pin, level)?;
        Ok(Output::new(self, pin))
    }
}
