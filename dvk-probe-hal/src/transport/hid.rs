use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use tracing::debug;

use super::DapTransport;
use crate::commands::{DapCommand, DapReport};
use crate::constants::{HID_READ_TIMEOUT, HID_REPORT_SIZE};
use crate::{DapInfo, DapInfoValue, Error, VendorCommand};

/// nRESET bit in the `DAP_SWJ_Pins` pin mask.
const PIN_NRESET: u8 = 1 << 7;

/// CMSIS-DAP transport over USB HID.
///
/// The probe is located by its USB serial number every time the transport is
/// opened, so it can be reopened after the probe reboots and re-enumerates.
pub struct HidTransport {
    unique_id: String,
    /// Kept between opens so the device list only has to be refreshed.
    ///
    /// The C hidapi library is not thread safe and the `hidapi` types are
    /// appropriately `!Sync`.
    api: Option<HidApi>,
    device: Option<HidDevice>,
    read_timeout: Duration,
}

impl HidTransport {
    /// Transport for the probe with the given unique ID. Nothing is opened yet.
    pub fn new(unique_id: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            api: None,
            device: None,
            read_timeout: HID_READ_TIMEOUT,
        }
    }

    /// Change how long to wait for each response.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    fn open_failed(&self, reason: impl Into<String>) -> Error {
        Error::OpenFailed {
            probe_id: self.unique_id.clone(),
            reason: reason.into(),
        }
    }

    fn find_and_open(&self, api: &HidApi) -> Result<HidDevice, Error> {
        let info = api
            .device_list()
            .find(|d| {
                d.serial_number() == Some(self.unique_id.as_str())
                    && d.product_string().is_some_and(|p| p.contains("CMSIS-DAP"))
            })
            .ok_or_else(|| self.open_failed("no CMSIS-DAP HID interface with this serial number"))?;
        debug!(path = ?info.path(), "opening probe {}", self.unique_id);
        info.open_device(api)
            .map_err(|e| self.open_failed(e.to_string()))
    }

    /// Write the report to the probe and read its response.
    fn transfer(&self, report: &DapReport) -> Result<[u8; HID_REPORT_SIZE], Error> {
        let device = self.device.as_ref().ok_or(Error::SessionClosed)?;
        device.write(&report.report_bytes())?;

        let mut read_buffer = [0u8; HID_REPORT_SIZE];
        let timeout_ms = i32::try_from(self.read_timeout.as_millis()).unwrap_or(i32::MAX);
        let read = device.read_timeout(&mut read_buffer, timeout_ms)?;
        if read == 0 {
            return Err(Error::Timeout);
        }

        if read_buffer[0] != report.command_id() {
            return Err(Error::MismatchedCommandEcho {
                sent: report.command_id(),
                received: read_buffer[0],
            });
        }
        Ok(read_buffer)
    }
}

impl std::fmt::Debug for HidTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidTransport")
            .field("unique_id", &self.unique_id)
            .field("open", &self.device.is_some())
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

impl DapTransport for HidTransport {
    fn open(&mut self) -> Result<(), Error> {
        if self.device.is_some() {
            return Ok(());
        }
        let api = match self.api.take() {
            Some(mut api) => {
                api.refresh_devices()?;
                api
            }
            None => HidApi::new()?,
        };
        let device = self.find_and_open(&api);
        self.api = Some(api);
        self.device = Some(device?);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        // hidapi closes the handle on drop.
        self.device = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }

    fn vendor_request(&mut self, command: VendorCommand, payload: &[u8]) -> Result<Vec<u8>, Error> {
        let mut report = DapReport::new(DapCommand::Vendor(command));
        report.set_payload(payload)?;
        let buf = self.transfer(&report)?;
        Ok(buf[1..].to_vec())
    }

    fn assert_reset(&mut self, asserted: bool) -> Result<(), Error> {
        // nRESET is active low. The trailing four bytes are a zero wait time.
        let output = if asserted { 0 } else { PIN_NRESET };
        let mut report = DapReport::new(DapCommand::SwjPins);
        report.set_payload(&[output, PIN_NRESET, 0, 0, 0, 0])?;
        self.transfer(&report)?;
        Ok(())
    }

    fn identify(&mut self, info: DapInfo) -> Result<DapInfoValue, Error> {
        let mut report = DapReport::new(DapCommand::Info);
        report.set_payload(&[info.id()])?;
        let buf = self.transfer(&report)?;
        let length = usize::from(buf[1]).min(HID_REPORT_SIZE - 2);
        Ok(DapInfoValue::from_response(info, &buf[2..2 + length]))
    }
}
