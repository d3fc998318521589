//! End-to-end scenarios through the public API, against a simulated probe.

use std::time::Duration;

use dvk_probe_hal::discovery::{self, DVK_PROBE, KNOWN_FAMILIES, ProbeIdentity, UsbDescriptor};
use dvk_probe_hal::ports::{self, DiscoveryIncomplete, PortHandle};
use dvk_probe_hal::{
    ChunkedChannel, DapInfo, DapInfoValue, DapTransport, Error, ProbeSession, SessionConfig,
    SettingsRecord, VendorCommand,
};

/// A probe firmware stand-in: a 256-byte EEPROM behind the settings vendor
/// commands, and target names loaded from it at reboot.
struct SimulatedProbe {
    eeprom: Vec<u8>,
    open: bool,
    /// Length acknowledged for each write chunk, if not the requested one.
    short_ack: Option<u8>,
    write_requests: Vec<Vec<u8>>,
    reboots: usize,
    target: (String, String),
}

impl SimulatedProbe {
    fn new() -> Self {
        Self {
            eeprom: vec![0xFF; 256],
            open: false,
            short_ack: None,
            write_requests: Vec::new(),
            reboots: 0,
            target: (String::new(), String::new()),
        }
    }
}

impl DapTransport for SimulatedProbe {
    fn open(&mut self) -> Result<(), Error> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn vendor_request(&mut self, command: VendorCommand, payload: &[u8]) -> Result<Vec<u8>, Error> {
        assert!(self.open);
        match command {
            VendorCommand::WriteSettings => {
                self.write_requests.push(payload.to_vec());
                let address = usize::from(payload[0]);
                let data = &payload[2..];
                self.eeprom[address..address + data.len()].copy_from_slice(data);
                Ok(vec![self.short_ack.unwrap_or(payload[1])])
            }
            VendorCommand::ReadSettings => {
                let address = usize::from(payload[0]);
                let length = usize::from(payload[1]);
                let mut response = vec![payload[1]];
                response.extend_from_slice(&self.eeprom[address..address + length]);
                Ok(response)
            }
            VendorCommand::Reboot => {
                self.reboots += 1;
                if let Ok(record) = SettingsRecord::from_bytes(&self.eeprom) {
                    self.target = (record.target_device_vendor, record.target_device_name);
                }
                Ok(vec![0])
            }
            _ => Ok(vec![0]),
        }
    }

    fn assert_reset(&mut self, _asserted: bool) -> Result<(), Error> {
        Ok(())
    }

    fn identify(&mut self, info: DapInfo) -> Result<DapInfoValue, Error> {
        Ok(match info {
            DapInfo::TargetDeviceVendor => DapInfoValue::Text(self.target.0.clone()),
            DapInfo::TargetDeviceName => DapInfoValue::Text(self.target.1.clone()),
            _ => DapInfoValue::Absent,
        })
    }
}

fn identity(id: &str) -> ProbeIdentity {
    ProbeIdentity {
        unique_id: id.into(),
        vendor: DVK_PROBE.vendor.into(),
        product: DVK_PROBE.product.into(),
    }
}

fn fast() -> SessionConfig {
    SessionConfig {
        boot_settle: Duration::ZERO,
        reset_pulse: Duration::ZERO,
        ..SessionConfig::default()
    }
}

fn port(path: &str, location: &str, serial: &str) -> PortHandle {
    PortHandle {
        path: path.into(),
        location: location.into(),
        serial_number: Some(serial.into()),
    }
}

#[test]
fn if820_settings_read_back_identical() {
    let mut probe = SimulatedProbe::new();
    let mut session = ProbeSession::new(identity("scenario-a"), &mut probe, fast()).unwrap();
    session.open().unwrap();

    let record = SettingsRecord::new("ARM", "cortex_m", "Laird Connectivity", "IF820");
    assert_eq!(record, SettingsRecord::if820_dvk());
    session.write_settings(&record).unwrap();
    assert_eq!(session.read_settings().unwrap(), record);
    let raw = session.read_settings_raw().unwrap();
    assert_eq!(raw[..SettingsRecord::ENCODED_LEN], record.to_bytes().unwrap()[..]);
    drop(session);

    // 129 bytes go out as 60 + 60 + 9.
    let chunks: Vec<(u8, u8)> = probe.write_requests.iter().map(|r| (r[0], r[1])).collect();
    assert_eq!(chunks, vec![(0, 60), (60, 60), (120, 9)]);
}

#[test]
fn short_acknowledgement_stops_the_write() {
    let mut probe = SimulatedProbe::new();
    probe.open = true;
    probe.short_ack = Some(55);

    let result = ChunkedChannel::settings(&mut probe).write(0, &[0xA5; 129]);
    assert!(matches!(
        result,
        Err(Error::TransferFault {
            address: 0,
            requested: 60,
            reported: Some(55)
        })
    ));
    assert_eq!(probe.write_requests.len(), 1);
}

#[test]
fn ports_pair_by_serial_number() {
    let all = [
        port("/dev/ttyACM1", "1-1.2:1.3", "X"),
        port("/dev/ttyACM0", "1-1.2:1.1", "X"),
        port("/dev/ttyACM2", "1-1.4:1.1", "Y"),
    ];

    let x = ports::resolve(&identity("X"), &all).unwrap();
    assert_eq!(x.shell.path, "/dev/ttyACM0");
    assert_eq!(x.data.path, "/dev/ttyACM1");

    assert_eq!(
        ports::resolve(&identity("Y"), &all),
        Err(DiscoveryIncomplete {
            unique_id: "Y".into(),
            found: 1
        })
    );

    // Discovery leaves the incomplete probe out.
    let devices: Vec<UsbDescriptor> = ["X", "Y"]
        .into_iter()
        .map(|serial| UsbDescriptor {
            vendor: Some(DVK_PROBE.vendor.into()),
            product: Some(DVK_PROBE.product.into()),
            serial_number: Some(serial.into()),
        })
        .collect();
    let found = discovery::discover(KNOWN_FAMILIES, &devices, &all);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].ports, x);
}

#[test]
fn programming_is_verified_before_reboot() {
    /// Drops every other byte written, so the read-back never matches.
    struct Forgetful(SimulatedProbe);

    impl DapTransport for Forgetful {
        fn open(&mut self) -> Result<(), Error> {
            self.0.open()
        }
        fn close(&mut self) -> Result<(), Error> {
            self.0.close()
        }
        fn is_open(&self) -> bool {
            self.0.is_open()
        }
        fn vendor_request(
            &mut self,
            command: VendorCommand,
            payload: &[u8],
        ) -> Result<Vec<u8>, Error> {
            let mut payload = payload.to_vec();
            if command == VendorCommand::WriteSettings {
                payload.iter_mut().skip(2).step_by(2).for_each(|b| *b = 0);
            }
            self.0.vendor_request(command, &payload)
        }
        fn assert_reset(&mut self, asserted: bool) -> Result<(), Error> {
            self.0.assert_reset(asserted)
        }
        fn identify(&mut self, info: DapInfo) -> Result<DapInfoValue, Error> {
            self.0.identify(info)
        }
    }

    let mut probe = Forgetful(SimulatedProbe::new());
    let mut session = ProbeSession::new(identity("scenario-verify"), &mut probe, fast()).unwrap();
    session.open().unwrap();
    assert!(matches!(
        session.program_settings(&SettingsRecord::if820_dvk()),
        Err(Error::VerificationFailed { .. })
    ));
    drop(session);
    assert_eq!(probe.0.reboots, 0);
}

#[test]
fn programming_applies_new_target() {
    let mut probe = SimulatedProbe::new();
    let mut session = ProbeSession::new(identity("scenario-program"), &mut probe, fast()).unwrap();
    session.open().unwrap();
    session
        .program_settings(&SettingsRecord::new("ARM", "cortex_m4", "Acme", "Widget"))
        .unwrap();
    assert_eq!(
        session.target_names().unwrap(),
        ("ARM".to_owned(), "cortex_m4".to_owned())
    );
    drop(session);
    assert_eq!(probe.reboots, 1);
    assert!(!probe.open);
}
