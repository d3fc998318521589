//! Simulated probe for unit tests.

use crate::constants::{DAP_OK, MAX_SETTINGS_SIZE, PROBE_PRODUCT_STRING, PROBE_VENDOR_STRING};
use crate::{DapInfo, DapInfoValue, DapTransport, Error, SettingsRecord, VendorCommand};

/// Probe with an in-memory EEPROM and GPIO bank that records every request.
pub(crate) struct FakeProbe {
    pub(crate) eeprom: [u8; MAX_SETTINGS_SIZE],
    pub(crate) requests: Vec<(VendorCommand, Vec<u8>)>,
    pub(crate) open: bool,
    pub(crate) opens: usize,
    pub(crate) closes: usize,
    pub(crate) refuse_open: bool,
    /// Refuse to open once a reboot has been requested.
    pub(crate) refuse_open_after_reboot: bool,
    /// Report a successful open but stay closed.
    pub(crate) open_stays_closed: bool,
    /// Fail every close after letting go of the link.
    pub(crate) fail_close: bool,
    /// Acknowledge every write chunk with this length instead of the real one.
    pub(crate) write_ack_override: Option<u8>,
    /// Declare this length for every read chunk instead of the real one.
    pub(crate) read_length_override: Option<u8>,
    /// Store written bytes inverted, so the read-back differs.
    pub(crate) corrupt_writes: bool,
    /// Time out every vendor request after this many have been answered.
    pub(crate) fail_after: Option<usize>,
    pub(crate) reboot_status: u8,
    pub(crate) reboots: Vec<bool>,
    /// Report the EEPROM contents as the target after a reboot.
    pub(crate) apply_on_reboot: bool,
    pub(crate) target: (String, String),
    pub(crate) identifies: Vec<DapInfo>,
    pub(crate) gpio_levels: [u8; 32],
    pub(crate) gpio_directions: [u8; 32],
    pub(crate) gpio_options: [u8; 32],
    pub(crate) gpio_status: u8,
    /// Answer GPIO commands with an empty response.
    pub(crate) mute_gpio: bool,
    pub(crate) reset_line: Vec<bool>,
}

impl FakeProbe {
    pub(crate) fn new() -> Self {
        Self {
            eeprom: [0xFF; MAX_SETTINGS_SIZE],
            requests: Vec::new(),
            open: false,
            opens: 0,
            closes: 0,
            refuse_open: false,
            refuse_open_after_reboot: false,
            open_stays_closed: false,
            fail_close: false,
            write_ack_override: None,
            read_length_override: None,
            corrupt_writes: false,
            fail_after: None,
            reboot_status: DAP_OK,
            reboots: Vec::new(),
            apply_on_reboot: true,
            target: (String::new(), String::new()),
            identifies: Vec::new(),
            gpio_levels: [0; 32],
            gpio_directions: [0; 32],
            gpio_options: [0; 32],
            gpio_status: DAP_OK,
            mute_gpio: false,
            reset_line: Vec::new(),
        }
    }

    pub(crate) fn requests_for(&self, command: VendorCommand) -> Vec<Vec<u8>> {
        self.requests
            .iter()
            .filter(|(c, _)| *c == command)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    fn write_settings(&mut self, payload: &[u8]) -> Vec<u8> {
        let address = usize::from(payload[0]);
        let data = &payload[2..];
        for (offset, byte) in data.iter().enumerate() {
            self.eeprom[address + offset] = if self.corrupt_writes { !byte } else { *byte };
        }
        vec![self.write_ack_override.unwrap_or(payload[1])]
    }

    fn read_settings(&self, payload: &[u8]) -> Vec<u8> {
        let address = usize::from(payload[0]);
        let length = usize::from(payload[1]);
        let mut response = vec![self.read_length_override.unwrap_or(payload[1])];
        response.extend_from_slice(&self.eeprom[address..address + length]);
        response
    }

    fn reboot(&mut self, payload: &[u8]) -> Vec<u8> {
        self.reboots.push(payload[0] != 0);
        if self.reboot_status == DAP_OK && self.apply_on_reboot {
            if let Ok(record) = SettingsRecord::from_bytes(&self.eeprom) {
                self.target = (record.target_device_vendor, record.target_device_name);
            }
        }
        vec![self.reboot_status]
    }
}

impl DapTransport for FakeProbe {
    fn open(&mut self) -> Result<(), Error> {
        if self.refuse_open || (self.refuse_open_after_reboot && !self.reboots.is_empty()) {
            return Err(Error::OpenFailed {
                probe_id: "fake".into(),
                reason: "refused".into(),
            });
        }
        self.opens += 1;
        self.open = !self.open_stays_closed;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.closes += 1;
        self.open = false;
        if self.fail_close {
            return Err(Error::Timeout);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn vendor_request(&mut self, command: VendorCommand, payload: &[u8]) -> Result<Vec<u8>, Error> {
        assert!(self.open, "request to a closed probe");
        if self.fail_after.is_some_and(|n| self.requests.len() >= n) {
            return Err(Error::Timeout);
        }
        self.requests.push((command, payload.to_vec()));

        let response = match command {
            VendorCommand::WriteSettings => self.write_settings(payload),
            VendorCommand::ReadSettings => self.read_settings(payload),
            VendorCommand::Reboot => self.reboot(payload),
            _ if self.mute_gpio => Vec::new(),
            VendorCommand::ReadGpio => vec![self.gpio_levels[usize::from(payload[0])]],
            VendorCommand::SetGpioLevel => {
                self.gpio_levels[usize::from(payload[0])] = payload[1];
                vec![self.gpio_status]
            }
            VendorCommand::SetGpioDirection => {
                self.gpio_directions[usize::from(payload[0])] = payload[1];
                self.gpio_options[usize::from(payload[0])] = payload[2];
                vec![self.gpio_status]
            }
        };
        Ok(response)
    }

    fn assert_reset(&mut self, asserted: bool) -> Result<(), Error> {
        self.reset_line.push(asserted);
        Ok(())
    }

    fn identify(&mut self, info: DapInfo) -> Result<DapInfoValue, Error> {
        self.identifies.push(info);
        let text = |s: &str| DapInfoValue::Text(s.to_owned());
        Ok(match info {
            DapInfo::Vendor => text(PROBE_VENDOR_STRING),
            DapInfo::Product => text(PROBE_PRODUCT_STRING),
            DapInfo::TargetDeviceVendor => text(&self.target.0),
            DapInfo::TargetDeviceName => text(&self.target.1),
            DapInfo::PacketSize => DapInfoValue::Short(64),
            _ => DapInfoValue::Absent,
        })
    }
}
