use crate::commands::VendorCommand;

/// Problems when talking to a DVK Probe or handling its settings.
///
/// Every variant is terminal for the operation that produced it. Nothing in this
/// crate retries on the caller's behalf; in particular a failed
/// [`ProbeSession::program_settings`] should be restarted from the beginning.
///
/// A probe that is skipped during discovery because it lacks serial ports is not
/// reported through this type, see [`DiscoveryIncomplete`].
///
/// [`ProbeSession::program_settings`]: crate::ProbeSession::program_settings
/// [`DiscoveryIncomplete`]: crate::ports::DiscoveryIncomplete
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The probe could not be opened for communication.
    #[error("unable to open probe {probe_id}: {reason}")]
    OpenFailed {
        /// Unique ID (USB serial number) of the probe.
        probe_id: String,
        /// Why the transport could not be made ready.
        reason: String,
    },
    /// A single-shot command got a missing or unexpected response byte.
    #[error("unexpected response to {command:?}: expected {expected}, received {received:?}")]
    ProtocolError {
        /// Vendor command that was sent.
        command: VendorCommand,
        /// Description of the acceptable response.
        expected: &'static str,
        /// First response byte, if there was one.
        received: Option<u8>,
    },
    /// The probe acknowledged a different length than requested for one chunk
    /// of a settings read or write.
    ///
    /// The EEPROM contents are in an unknown state after a failed write.
    #[error(
        "transfer fault at address {address}: requested {requested} bytes, probe reported {reported:?}"
    )]
    TransferFault {
        /// EEPROM address of the failed chunk.
        address: u8,
        /// Chunk length that was requested.
        requested: u8,
        /// Length reported by the probe, or `None` if it did not answer.
        reported: Option<u8>,
    },
    /// A settings text field is longer than its fixed slot.
    #[error("settings field `{field}` is {length} bytes when UTF-8 encoded, at most 32 allowed")]
    Encoding {
        /// Name of the offending field.
        field: &'static str,
        /// UTF-8 length of the supplied text.
        length: usize,
    },
    /// A settings text field contains a NUL or is not valid UTF-8.
    #[error("settings field `{field}` is not valid NUL-free UTF-8 text")]
    InvalidSettingsText {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A buffer is larger than the area it is destined for.
    #[error("{length} bytes exceeds the maximum of {max}")]
    TooLarge {
        /// Length of the buffer.
        length: usize,
        /// Largest accepted length.
        max: usize,
    },
    /// A settings buffer is too short to hold a settings record.
    #[error("settings buffer is {length} bytes, expected at least {expected}")]
    SettingsTruncated {
        /// Length of the buffer.
        length: usize,
        /// Encoded length of a settings record.
        expected: usize,
    },
    /// The settings record has a layout version this crate does not understand.
    #[error("unsupported settings version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version byte found in the record.
        found: u8,
        /// Version this crate reads and writes.
        expected: u8,
    },
    /// A chunk would start at an EEPROM address that cannot be sent in one byte.
    #[error("EEPROM address {address} is out of range")]
    AddressOutOfRange {
        /// The unrepresentable address.
        address: usize,
    },
    /// The settings read back after a write differ from those written.
    #[error("settings verification failed: wrote {expected:02X?}, read back {actual:02X?}")]
    VerificationFailed {
        /// Encoded record that was written.
        expected: Vec<u8>,
        /// Bytes read back from the same addresses.
        actual: Vec<u8>,
    },
    /// The probe refused to reboot.
    ///
    /// The enclosed `u8` is the status code returned in place of success (0).
    #[error("probe reboot failed with status {0:#04X}")]
    RebootFailed(u8),
    /// After rebooting, the probe does not report the target that was just
    /// programmed.
    #[error(
        "target device vendor [{reported_vendor}] and device name [{reported_name}] do not match the programmed settings [{expected_vendor}] [{expected_name}]"
    )]
    SettingsNotApplied {
        /// Programmed target device vendor.
        expected_vendor: String,
        /// Programmed target device name.
        expected_name: String,
        /// Target device vendor reported by the probe.
        reported_vendor: String,
        /// Target device name reported by the probe.
        reported_name: String,
    },
    /// An operation that needs an open session was attempted on a closed one.
    #[error("probe session is closed")]
    SessionClosed,
    /// An operation was started while another was still in progress.
    #[error("probe session is busy")]
    SessionBusy,
    /// Another session for the same probe is alive in this process.
    #[error("a session for probe {0} is already open")]
    AlreadyOpen(String),
    /// The number does not name a GPIO pin of the probe.
    #[error("GPIO{0} is not a probe pin")]
    InvalidPin(u8),
    /// The probe did not answer within the read timeout.
    #[error("timed out waiting for the probe")]
    Timeout,
    /// The command ID echoed by the probe was not the one written to it.
    #[error("probe echoed command {received:#04X}, sent {sent:#04X}")]
    MismatchedCommandEcho {
        /// Command ID sent to the probe.
        sent: u8,
        /// Command ID echoed by the probe.
        received: u8,
    },
    /// Error from the underlying USB HID library.
    #[error(transparent)]
    HidApi(#[from] hidapi::HidError),
    /// Error while listing the host's serial ports.
    #[error(transparent)]
    SerialPort(#[from] serialport::Error),
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
