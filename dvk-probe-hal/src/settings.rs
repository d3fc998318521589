//! Settings record kept in the probe's EEPROM.

use crate::Error;
use crate::constants::{
    IF820_BOARD_NAME, IF820_BOARD_VENDOR, IF820_DEVICE_NAME, IF820_DEVICE_VENDOR,
    MAX_SETTINGS_SIZE, SETTINGS_VERSION,
};

/// Width of each text slot in the encoded record.
const FIELD_LEN: usize = 32;

/// Target description stored in the DVK Probe's EEPROM.
///
/// The probe reports these strings through `DAP_Info` after it boots, which is
/// how debug tools learn which target and board the probe is attached to.
///
/// The encoded layout is a version byte followed by four 32-byte text slots, in
/// field order, 129 bytes in total. Text is UTF-8, padded with NUL bytes to the
/// slot width. The record lives at EEPROM address 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRecord {
    /// Layout version, must be [`SETTINGS_VERSION`].
    pub version: u8,
    /// Vendor of the target device, eg "ARM".
    pub target_device_vendor: String,
    /// Name of the target device, eg "cortex_m".
    pub target_device_name: String,
    /// Vendor of the target board.
    pub target_board_vendor: String,
    /// Name of the target board.
    pub target_board_name: String,
}

impl SettingsRecord {
    /// Length of the encoded record.
    pub const ENCODED_LEN: usize = 1 + 4 * FIELD_LEN;

    /// Create a current-version record.
    pub fn new(
        target_device_vendor: impl Into<String>,
        target_device_name: impl Into<String>,
        target_board_vendor: impl Into<String>,
        target_board_name: impl Into<String>,
    ) -> Self {
        Self {
            version: SETTINGS_VERSION,
            target_device_vendor: target_device_vendor.into(),
            target_device_name: target_device_name.into(),
            target_board_vendor: target_board_vendor.into(),
            target_board_name: target_board_name.into(),
        }
    }

    /// Settings for a probe fitted to an IF820 DVK.
    pub fn if820_dvk() -> Self {
        Self::new(
            IF820_DEVICE_VENDOR,
            IF820_DEVICE_NAME,
            IF820_BOARD_VENDOR,
            IF820_BOARD_NAME,
        )
    }

    fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("target_device_vendor", &self.target_device_vendor),
            ("target_device_name", &self.target_device_name),
            ("target_board_vendor", &self.target_board_vendor),
            ("target_board_name", &self.target_board_name),
        ]
    }

    /// Encode the record into its EEPROM layout.
    ///
    /// # Errors
    ///
    /// Fails if the version is not the supported one, if any text field is longer
    /// than 32 bytes once UTF-8 encoded or contains a NUL, or if the encoding would
    /// not fit in the settings area.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        if self.version != SETTINGS_VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: SETTINGS_VERSION,
            });
        }

        let mut buf = Vec::with_capacity(Self::ENCODED_LEN);
        buf.push(self.version);
        for (field, text) in self.fields() {
            let bytes = text.as_bytes();
            if bytes.len() > FIELD_LEN {
                return Err(Error::Encoding {
                    field,
                    length: bytes.len(),
                });
            }
            if bytes.contains(&0) {
                return Err(Error::InvalidSettingsText { field });
            }
            buf.extend_from_slice(bytes);
            buf.resize(buf.len() + FIELD_LEN - bytes.len(), 0);
        }

        if buf.len() > MAX_SETTINGS_SIZE {
            return Err(Error::TooLarge {
                length: buf.len(),
                max: MAX_SETTINGS_SIZE,
            });
        }
        Ok(buf)
    }

    /// Decode a record from EEPROM contents.
    ///
    /// `buf` may be longer than the record, as when the whole settings area has
    /// been read; anything past [`Self::ENCODED_LEN`] is ignored.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < Self::ENCODED_LEN {
            return Err(Error::SettingsTruncated {
                length: buf.len(),
                expected: Self::ENCODED_LEN,
            });
        }
        let version = buf[0];
        if version != SETTINGS_VERSION {
            return Err(Error::UnsupportedVersion {
                found: version,
                expected: SETTINGS_VERSION,
            });
        }

        let mut slots = buf[1..Self::ENCODED_LEN].chunks_exact(FIELD_LEN);
        let mut next = |field: &'static str| -> Result<String, Error> {
            let slot = slots.next().ok_or(Error::SettingsTruncated {
                length: buf.len(),
                expected: Self::ENCODED_LEN,
            })?;
            text_from_slot(field, slot)
        };
        Ok(Self {
            version,
            target_device_vendor: next("target_device_vendor")?,
            target_device_name: next("target_device_name")?,
            target_board_vendor: next("target_board_vendor")?,
            target_board_name: next("target_board_name")?,
        })
    }
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self::new("", "", "", "")
    }
}

/// Text content of a fixed slot, which ends at the first NUL.
fn text_from_slot(field: &'static str, slot: &[u8]) -> Result<String, Error> {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    std::str::from_utf8(&slot[..end])
        .map(str::to_owned)
        .map_err(|_| Error::InvalidSettingsText { field })
}
