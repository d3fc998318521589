use crate::Error;
use crate::constants::HID_REPORT_SIZE;

/// First CMSIS-DAP command ID reserved for vendor extensions.
const DAP_VENDOR0: u8 = 0x80;

/// CMSIS-DAP commands issued by this crate.
pub(crate) enum DapCommand {
    /// Read one item of probe information.
    ///
    /// See `DAP_Info` in the CMSIS-DAP command reference.
    Info,
    /// Drive the SWD/JTAG pins, used here only for the target reset line.
    ///
    /// See `DAP_SWJ_Pins` in the CMSIS-DAP command reference.
    SwjPins,
    /// DVK Probe firmware extension.
    Vendor(VendorCommand),
}

impl DapCommand {
    pub(crate) fn id(&self) -> u8 {
        match self {
            DapCommand::Info => 0x00,
            DapCommand::SwjPins => 0x10,
            DapCommand::Vendor(command) => command.command_id(),
        }
    }
}

/// Vendor commands implemented by the DVK Probe firmware.
///
/// Each is carried as a CMSIS-DAP vendor command, `DAP_Vendor0 + index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorCommand {
    /// Reboot the probe, optionally into its bootloader.
    ///
    /// Request `[bootloader]`, response `[status]`.
    Reboot,
    /// Write bytes into the settings EEPROM.
    ///
    /// Request `[address, length, data…]`, response `[length written]`.
    WriteSettings,
    /// Read bytes from the settings EEPROM.
    ///
    /// Request `[address, length]`, response `[length read, data…]`.
    ReadSettings,
    /// Read the level of a GPIO pin.
    ///
    /// Request `[pin]`, response `[level]`.
    ReadGpio,
    /// Set the output level of a GPIO pin.
    ///
    /// Request `[pin, level]`, response `[status]`.
    SetGpioLevel,
    /// Set a GPIO pin as input or output.
    ///
    /// Request `[pin, direction, option]`, response `[status]`.
    SetGpioDirection,
}

impl VendorCommand {
    /// Vendor command index as understood by the firmware.
    pub const fn index(self) -> u8 {
        match self {
            VendorCommand::Reboot => 26,
            VendorCommand::WriteSettings => 27,
            VendorCommand::ReadSettings => 28,
            VendorCommand::ReadGpio => 29,
            VendorCommand::SetGpioLevel => 30,
            VendorCommand::SetGpioDirection => 31,
        }
    }

    /// CMSIS-DAP command ID on the wire.
    pub const fn command_id(self) -> u8 {
        DAP_VENDOR0 + self.index()
    }
}

/// Outgoing CMSIS-DAP HID report.
pub(crate) struct DapReport {
    command_id: u8,
    /// Report body, command ID at index 0.
    ///
    /// The buffer handed to hidapi is one byte longer, as the HID report number
    /// has to be prepended.
    pub(crate) write_buffer: [u8; HID_REPORT_SIZE],
}

impl DapReport {
    pub(crate) fn new(command: DapCommand) -> Self {
        let command_id = command.id();
        let mut write_buffer = [0u8; HID_REPORT_SIZE];
        write_buffer[0] = command_id;
        Self {
            command_id,
            write_buffer,
        }
    }

    pub(crate) fn command_id(&self) -> u8 {
        self.command_id
    }

    pub(crate) fn report_bytes(&self) -> [u8; HID_REPORT_SIZE + 1] {
        let mut out = [0u8; HID_REPORT_SIZE + 1];
        out[1..].copy_from_slice(&self.write_buffer);
        out
    }

    /// Copy the command payload in after the command ID.
    pub(crate) fn set_payload(&mut self, payload: &[u8]) -> Result<(), Error> {
        let max = HID_REPORT_SIZE - 1;
        if payload.len() > max {
            return Err(Error::TooLarge {
                length: payload.len(),
                max,
            });
        }
        self.write_buffer[1..=payload.len()].copy_from_slice(payload);
        Ok(())
    }
}
