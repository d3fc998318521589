use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::constants::{HID_READ_TIMEOUT, PROBE_BOOT_TIME, RESET_PULSE};
use crate::discovery::{DiscoveredProbe, ProbeIdentity};
use crate::{DapInfo, DapInfoValue, DapTransport, Error, HidTransport, VendorCommand};

mod gpio;
mod registry;
mod settings;

use registry::Claim;
pub use registry::is_claimed;

/// Timing used by a [`ProbeSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long to wait after rebooting the probe before reconnecting.
    pub boot_settle: Duration,
    /// How long the target's reset line is held, and the wait after release.
    pub reset_pulse: Duration,
    /// How long to wait for each HID response.
    pub read_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            boot_settle: PROBE_BOOT_TIME,
            reset_pulse: RESET_PULSE,
            read_timeout: HID_READ_TIMEOUT,
        }
    }
}

/// Lifecycle state of a [`ProbeSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The transport is released. Only [`ProbeSession::open`] is accepted.
    Closed,
    /// Open and ready for a command.
    Idle,
    /// A command is in progress.
    ///
    /// A session is only left in this state if a transport call panicked.
    Busy,
}

/// An exclusive connection to one DVK Probe.
///
/// # Quick start
///
/// Find probes with [`discover_connected`](crate::discovery::discover_connected)
/// and connect to one with [`ProbeSession::connect`]. The session can then drive
/// the probe's GPIO pins, read and write its settings EEPROM, reboot it and
/// reset the target.
///
/// Only one session per probe may exist in a process at a time. The probe is
/// released when the session is dropped.
///
/// # Overview
///
/// - GPIO: [`gpio_read`](Self::gpio_read), [`gpio_set_direction`](Self::gpio_set_direction),
///   [`gpio_set_level`](Self::gpio_set_level), or the `embedded-hal` wrappers from
///   [`input_pin`](Self::input_pin) and [`output_pin`](Self::output_pin).
/// - Settings: [`read_settings`](Self::read_settings), [`write_settings`](Self::write_settings)
///   and [`program_settings`](Self::program_settings).
/// - Probe control: [`reboot`](Self::reboot), [`reset_target`](Self::reset_target),
///   [`info`](Self::info).
#[derive(Debug)]
pub struct ProbeSession<T: DapTransport> {
    identity: ProbeIdentity,
    transport: T,
    state: SessionState,
    config: SessionConfig,
    _claim: Claim,
}

impl ProbeSession<HidTransport> {
    /// Open a USB HID session to a discovered probe.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyOpen`] if this process already has a session for the probe,
    /// and [`Error::OpenFailed`] if it cannot be opened.
    pub fn connect(probe: &DiscoveredProbe, config: SessionConfig) -> Result<Self, Error> {
        let transport =
            HidTransport::new(&probe.identity.unique_id).with_read_timeout(config.read_timeout);
        let mut session = Self::new(probe.identity.clone(), transport, config)?;
        session.open()?;
        Ok(session)
    }
}

impl<T: DapTransport> ProbeSession<T> {
    ////////////////////////////////////////////////////////////////////////////////
    // Lifecycle
    ////////////////////////////////////////////////////////////////////////////////

    /// Create a closed session for `identity` over `transport`.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyOpen`] if another session for the same probe is alive.
    pub fn new(identity: ProbeIdentity, transport: T, config: SessionConfig) -> Result<Self, Error> {
        let claim = Claim::acquire(&identity.unique_id)?;
        Ok(Self {
            identity,
            transport,
            state: SessionState::Closed,
            config,
            _claim: claim,
        })
    }

    /// Make the probe ready for commands. Opening an open session does nothing.
    ///
    /// # Errors
    ///
    /// [`Error::OpenFailed`] if the transport cannot be opened, or reports
    /// success without coming up.
    pub fn open(&mut self) -> Result<(), Error> {
        if self.state != SessionState::Closed {
            return Ok(());
        }
        let probe_id = &self.identity.unique_id;
        self.transport.open().map_err(|e| match e {
            e @ Error::OpenFailed { .. } => e,
            other => Error::OpenFailed {
                probe_id: probe_id.clone(),
                reason: other.to_string(),
            },
        })?;
        if !self.transport.is_open() {
            return Err(Error::OpenFailed {
                probe_id: probe_id.clone(),
                reason: "link did not come up".into(),
            });
        }
        debug!("Opened probe {probe_id}");
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Release the probe.
    ///
    /// Closing never fails. Transport errors are logged and the session ends up
    /// closed regardless. Returns `false` if the session was already closed.
    pub fn close(&mut self) -> bool {
        let was_open = self.state != SessionState::Closed || self.transport.is_open();
        if was_open {
            if let Err(e) = self.transport.close() {
                warn!("Error closing probe {}: {e}", self.identity.unique_id);
            }
            debug!("Closed probe {}", self.identity.unique_id);
        }
        self.state = SessionState::Closed;
        was_open
    }

    /// Identity of the probe this session is bound to.
    pub fn identity(&self) -> &ProbeIdentity {
        &self.identity
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether commands can be sent.
    pub fn is_open(&self) -> bool {
        self.state != SessionState::Closed
    }

    /// Timing in use.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one command against the open transport, marking the session busy
    /// for its duration.
    fn with_transport<R>(
        &mut self,
        command: impl FnOnce(&mut T) -> Result<R, Error>,
    ) -> Result<R, Error> {
        match self.state {
            SessionState::Closed => return Err(Error::SessionClosed),
            SessionState::Busy => return Err(Error::SessionBusy),
            SessionState::Idle => {}
        }
        self.state = SessionState::Busy;
        let result = command(&mut self.transport);
        self.state = SessionState::Idle;
        result
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Probe control
    ////////////////////////////////////////////////////////////////////////////////

    /// Read one item of CMSIS-DAP probe information.
    pub fn info(&mut self, info: DapInfo) -> Result<DapInfoValue, Error> {
        self.with_transport(|t| t.identify(info))
    }

    /// Target device vendor and name the probe currently reports.
    ///
    /// These come from the settings the probe loaded at boot, so they only
    /// change after [`reboot`](Self::reboot).
    pub fn target_names(&mut self) -> Result<(String, String), Error> {
        self.with_transport(|t| t.target_names())
    }

    /// Reboot the probe, optionally into its bootloader.
    ///
    /// Returns the probe's status byte, where 0 is success. The probe drops off
    /// the bus shortly afterwards, so the session should be closed.
    pub fn reboot(&mut self, into_bootloader: bool) -> Result<u8, Error> {
        let payload = [u8::from(into_bootloader)];
        let response = self.with_transport(|t| t.vendor_request(VendorCommand::Reboot, &payload))?;
        response.first().copied().ok_or(Error::ProtocolError {
            command: VendorCommand::Reboot,
            expected: "a status byte",
            received: None,
        })
    }

    /// Pulse the target's reset line.
    pub fn reset_target(&mut self) -> Result<(), Error> {
        let pulse = self.config.reset_pulse;
        self.with_transport(|t| {
            t.assert_reset(true)?;
            thread::sleep(pulse);
            t.assert_reset(false)?;
            thread::sleep(pulse);
            Ok(())
        })?;
        info!("Reset target of probe {}", self.identity.unique_id);
        Ok(())
    }
}

impl<T: DapTransport> Drop for ProbeSession<T> {
    fn drop(&mut self) {
        self.close();
    }
}
