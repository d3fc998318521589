//! Pairing a probe with its companion serial ports.
//!
//! The DVK Probe enumerates two USB CDC serial ports alongside its CMSIS-DAP
//! interface, both carrying the probe's USB serial number. The first one (in
//! physical location order) is wired to the target's shell UART and the second
//! to its data UART.

use tracing::debug;

use crate::Error;
use crate::discovery::ProbeIdentity;

/// A serial port visible to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortHandle {
    /// Device path, eg `/dev/ttyACM0` or `COM4`.
    pub path: String,
    /// Physical location of the port on the USB bus.
    pub location: String,
    /// USB serial number of the device the port belongs to.
    pub serial_number: Option<String>,
}

/// What a probe's serial port is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortRole {
    /// Target shell console.
    Shell,
    /// Target data channel.
    Data,
}

/// The serial ports belonging to one probe, by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePorts {
    /// Port wired to the target shell console.
    pub shell: PortHandle,
    /// Port wired to the target data channel.
    pub data: PortHandle,
    /// Further ports with the probe's serial number, in sorted order.
    pub extra: Vec<PortHandle>,
}

impl ProbePorts {
    /// Port assigned to `role`.
    pub fn get(&self, role: PortRole) -> &PortHandle {
        match role {
            PortRole::Shell => &self.shell,
            PortRole::Data => &self.data,
        }
    }

    /// Role-assigned ports, shell first.
    pub fn iter(&self) -> impl Iterator<Item = (PortRole, &PortHandle)> {
        [(PortRole::Shell, &self.shell), (PortRole::Data, &self.data)].into_iter()
    }
}

/// A probe that did not have enough serial ports to be usable.
///
/// This is not fatal. Discovery logs it and leaves the probe out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("probe {unique_id} has {found} serial port(s), at least 2 required")]
pub struct DiscoveryIncomplete {
    /// Unique ID of the probe.
    pub unique_id: String,
    /// Number of serial ports that matched.
    pub found: usize,
}

/// Select `identity`'s ports from `all_ports` and assign their roles.
///
/// Ports match when their serial number equals the probe's unique ID. Matches
/// are ordered by location, then by device path, so the result does not depend
/// on the order of `all_ports`.
pub fn resolve(
    identity: &ProbeIdentity,
    all_ports: &[PortHandle],
) -> Result<ProbePorts, DiscoveryIncomplete> {
    let mut matching: Vec<PortHandle> = all_ports
        .iter()
        .filter(|port| {
            let matches = port.serial_number.as_deref() == Some(identity.unique_id.as_str());
            if matches {
                debug!("Found probe serial port {} [{}]", port.path, identity.unique_id);
            }
            matches
        })
        .cloned()
        .collect();
    matching.sort_by(|a, b| (&a.location, &a.path).cmp(&(&b.location, &b.path)));

    let found = matching.len();
    let mut sorted = matching.into_iter();
    match (sorted.next(), sorted.next()) {
        (Some(shell), Some(data)) => Ok(ProbePorts {
            shell,
            data,
            extra: sorted.collect(),
        }),
        _ => Err(DiscoveryIncomplete {
            unique_id: identity.unique_id.clone(),
            found,
        }),
    }
}

/// List the host's serial ports.
///
/// Only USB serial ports can belong to a probe; other kinds are listed without a
/// serial number. `serialport` exposes the USB interface number rather than the
/// full bus location, which orders the ports of one device the same way.
pub fn host_ports() -> Result<Vec<PortHandle>, Error> {
    let ports = serialport::available_ports()?
        .into_iter()
        .map(|port| match port.port_type {
            serialport::SerialPortType::UsbPort(info) => PortHandle {
                path: port.port_name,
                location: info
                    .interface
                    .map(|interface| format!("{interface:03}"))
                    .unwrap_or_default(),
                serial_number: info.serial_number,
            },
            _ => PortHandle {
                path: port.port_name,
                location: String::new(),
                serial_number: None,
            },
        })
        .collect();
    Ok(ports)
}
