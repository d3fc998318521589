//! Fixed values shared with the DVK Probe firmware.

use std::time::Duration;

/// USB manufacturer string reported by the DVK Probe.
pub const PROBE_VENDOR_STRING: &str = "Laird Connectivity";
/// USB product string reported by the DVK Probe.
pub const PROBE_PRODUCT_STRING: &str = "DVK Probe CMSIS-DAP";

/// Largest payload moved by a single settings read or write request.
pub const MAX_CHUNK_LEN: usize = 60;
/// Size of the settings area in the probe's EEPROM.
pub const MAX_SETTINGS_SIZE: usize = 256;
/// EEPROM address of the first byte of the settings record.
pub const SETTINGS_BASE_ADDRESS: u8 = 0;
/// Settings record layout version understood by this crate.
pub const SETTINGS_VERSION: u8 = 1;

/// Status byte returned by the probe when a command succeeded.
pub const DAP_OK: u8 = 0x00;

/// Time the probe needs to re-enumerate on the USB bus after a reboot.
pub const PROBE_BOOT_TIME: Duration = Duration::from_secs(5);
/// How long the target reset line is held, and the pause after releasing it.
pub const RESET_PULSE: Duration = Duration::from_millis(50);
/// How long to wait for a HID response before giving up.
pub const HID_READ_TIMEOUT: Duration = Duration::from_millis(1000);

/// Target device vendor programmed into IF820 DVK probes.
pub const IF820_DEVICE_VENDOR: &str = "ARM";
/// Target device name programmed into IF820 DVK probes.
pub const IF820_DEVICE_NAME: &str = "cortex_m";
/// Target board vendor programmed into IF820 DVK probes.
pub const IF820_BOARD_VENDOR: &str = "Laird Connectivity";
/// Target board name programmed into IF820 DVK probes.
pub const IF820_BOARD_NAME: &str = "IF820";

/// CMSIS-DAP HID report size, excluding the report number.
pub(crate) const HID_REPORT_SIZE: usize = 64;
