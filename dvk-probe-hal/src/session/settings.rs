use std::thread;

use tracing::{debug, info};

use super::ProbeSession;
use crate::constants::{DAP_OK, MAX_SETTINGS_SIZE, SETTINGS_BASE_ADDRESS};
use crate::{ChunkedChannel, DapTransport, Error, SettingsRecord};

impl<T: DapTransport> ProbeSession<T> {
    /// Write a settings record to the probe's EEPROM.
    ///
    /// The probe only acts on new settings after a reboot. Use
    /// [`program_settings`](Self::program_settings) to write, verify and apply
    /// them in one go.
    ///
    /// Returns the number of bytes written.
    pub fn write_settings(&mut self, record: &SettingsRecord) -> Result<usize, Error> {
        let bytes = record.to_bytes()?;
        self.with_transport(|t| ChunkedChannel::settings(t).write(SETTINGS_BASE_ADDRESS, &bytes))
    }

    /// Read the whole settings area of the EEPROM without decoding it.
    pub fn read_settings_raw(&mut self) -> Result<Vec<u8>, Error> {
        self.with_transport(|t| {
            ChunkedChannel::settings(t).read(SETTINGS_BASE_ADDRESS, MAX_SETTINGS_SIZE)
        })
    }

    /// Read and decode the settings record from the probe's EEPROM.
    pub fn read_settings(&mut self) -> Result<SettingsRecord, Error> {
        SettingsRecord::from_bytes(&self.read_settings_raw()?)
    }

    /// Write new settings to the probe and make it use them.
    ///
    /// 1. The record is written and read back. If the bytes differ the probe is
    ///    not rebooted.
    /// 2. The probe is rebooted, the session closed, and after the configured
    ///    boot settle time the session is opened again.
    /// 3. The target device vendor and name the probe now reports are compared
    ///    with the record.
    ///
    /// Blocks for [`SessionConfig::boot_settle`](crate::SessionConfig::boot_settle).
    ///
    /// # Errors
    ///
    /// No step is retried. [`Error::VerificationFailed`], [`Error::RebootFailed`]
    /// and [`Error::SettingsNotApplied`] report the step that failed, and any
    /// transfer or open error is passed through. The session is closed if
    /// reopening fails.
    pub fn program_settings(&mut self, record: &SettingsRecord) -> Result<(), Error> {
        let expected = record.to_bytes()?;
        let probe_id = self.identity.unique_id.clone();

        info!("Writing settings to probe {probe_id}");
        self.write_settings(record)?;
        let mut actual = self.read_settings_raw()?;
        actual.truncate(expected.len());
        if actual != expected {
            return Err(Error::VerificationFailed { expected, actual });
        }
        debug!("Settings read back from probe {probe_id} match");

        info!("Rebooting probe {probe_id} to apply settings");
        let status = self.reboot(false)?;
        if status != DAP_OK {
            return Err(Error::RebootFailed(status));
        }
        self.close();
        thread::sleep(self.config.boot_settle);
        self.open()?;

        let (reported_vendor, reported_name) = self.target_names()?;
        if reported_vendor != record.target_device_vendor
            || reported_name != record.target_device_name
        {
            return Err(Error::SettingsNotApplied {
                expected_vendor: record.target_device_vendor.clone(),
                expected_name: record.target_device_name.clone(),
                reported_vendor,
                reported_name,
            });
        }
        info!("Probe {probe_id} now targets {reported_vendor} {reported_name}");
        Ok(())
    }
}
