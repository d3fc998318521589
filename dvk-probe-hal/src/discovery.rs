//! Finding connected probes.
//!
//! Discovery is driven by an explicit list of [`DeviceFamily`] descriptors. A USB
//! device belongs to a family when its manufacturer and product strings match the
//! family's exactly. Each matching device is then paired with its serial ports;
//! devices that cannot be paired are logged and left out.

use std::collections::BTreeSet;

use hidapi::HidApi;
use tracing::{debug, warn};

use crate::Error;
use crate::constants::{PROBE_PRODUCT_STRING, PROBE_VENDOR_STRING};
use crate::gpio::{ALL_PINS, GpioPin};
use crate::ports::{self, PortHandle, ProbePorts};

/// Identity of a probe, fixed at discovery.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeIdentity {
    /// Unique ID, the probe's USB serial number.
    pub unique_id: String,
    /// USB manufacturer string.
    pub vendor: String,
    /// USB product string.
    pub product: String,
}

/// A kind of probe that discovery knows how to recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFamily {
    /// Short human-readable name.
    pub name: &'static str,
    /// USB manufacturer string reported by the probe.
    pub vendor: &'static str,
    /// USB product string reported by the probe.
    pub product: &'static str,
    /// GPIO pins the family exposes.
    pub pins: &'static [GpioPin],
}

impl DeviceFamily {
    /// Whether a device with these descriptor strings belongs to the family.
    pub fn matches(&self, vendor: Option<&str>, product: Option<&str>) -> bool {
        vendor == Some(self.vendor) && product == Some(self.product)
    }
}

/// The Laird Connectivity DVK Probe.
pub const DVK_PROBE: DeviceFamily = DeviceFamily {
    name: "DVK Probe",
    vendor: PROBE_VENDOR_STRING,
    product: PROBE_PRODUCT_STRING,
    pins: ALL_PINS,
};

/// Every family supported by this crate.
pub const KNOWN_FAMILIES: &[DeviceFamily] = &[DVK_PROBE];

/// Descriptor strings of an enumerated USB device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsbDescriptor {
    /// Manufacturer string.
    pub vendor: Option<String>,
    /// Product string.
    pub product: Option<String>,
    /// Serial number string.
    pub serial_number: Option<String>,
}

/// A probe found by discovery, with its serial ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredProbe {
    /// Who the probe is.
    pub identity: ProbeIdentity,
    /// Which family it belongs to.
    pub family: DeviceFamily,
    /// Its serial ports by role.
    pub ports: ProbePorts,
}

/// Match `devices` against `families` and pair each match with its ports.
///
/// A device that appears more than once (one entry per HID interface) is only
/// reported once. Devices without a serial number cannot be paired and are
/// skipped, as are devices with fewer than two serial ports.
pub fn discover(
    families: &[DeviceFamily],
    devices: &[UsbDescriptor],
    all_ports: &[PortHandle],
) -> Vec<DiscoveredProbe> {
    let mut seen = BTreeSet::new();
    let mut probes = Vec::new();
    for device in devices {
        let Some(family) = families
            .iter()
            .find(|f| f.matches(device.vendor.as_deref(), device.product.as_deref()))
        else {
            continue;
        };
        let Some(unique_id) = device.serial_number.as_deref() else {
            warn!("{} without a serial number, skipping it", family.name);
            continue;
        };
        if !seen.insert(unique_id.to_owned()) {
            continue;
        }
        debug!("Found probe {unique_id}");

        let identity = ProbeIdentity {
            unique_id: unique_id.to_owned(),
            vendor: family.vendor.to_owned(),
            product: family.product.to_owned(),
        };
        match ports::resolve(&identity, all_ports) {
            Ok(ports) => probes.push(DiscoveredProbe {
                identity,
                family: *family,
                ports,
            }),
            Err(incomplete) => warn!("{incomplete}, skipping this probe"),
        }
    }
    probes
}

/// Descriptor strings of every HID device on the host.
pub fn usb_devices() -> Result<Vec<UsbDescriptor>, Error> {
    let api = HidApi::new()?;
    let devices = api
        .device_list()
        .map(|info| UsbDescriptor {
            vendor: info.manufacturer_string().map(str::to_owned),
            product: info.product_string().map(str::to_owned),
            serial_number: info.serial_number().map(str::to_owned),
        })
        .collect();
    Ok(devices)
}

/// Discover the probes connected to this host.
pub fn discover_connected(families: &[DeviceFamily]) -> Result<Vec<DiscoveredProbe>, Error> {
    let devices = usb_devices()?;
    let all_ports = ports::host_ports()?;
    for port in &all_ports {
        debug!(
            "Serial port {} [{}]",
            port.path,
            port.serial_number.as_deref().unwrap_or("-")
        );
    }
    Ok(discover(families, &devices, &all_ports))
}
