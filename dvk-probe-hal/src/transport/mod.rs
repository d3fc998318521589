use crate::{DapInfo, DapInfoValue, Error, VendorCommand};

mod hid;

pub use hid::HidTransport;

/// Command channel to a single probe.
///
/// [`ProbeSession`](crate::ProbeSession) and [`ChunkedChannel`](crate::ChunkedChannel)
/// only see command codes and payload bytes through this trait. Implementations
/// own the framing.
pub trait DapTransport {
    /// Make the probe ready for commands. Opening an open transport is a no-op.
    fn open(&mut self) -> Result<(), Error>;

    /// Release the probe.
    fn close(&mut self) -> Result<(), Error>;

    /// Whether the probe is ready for commands.
    fn is_open(&self) -> bool;

    /// Send a vendor command and return the response bytes that follow the
    /// echoed command ID.
    ///
    /// A response that does not arrive in time must be reported as
    /// [`Error::Timeout`].
    fn vendor_request(&mut self, command: VendorCommand, payload: &[u8]) -> Result<Vec<u8>, Error>;

    /// Drive the target's reset line. `true` holds the target in reset.
    fn assert_reset(&mut self, asserted: bool) -> Result<(), Error>;

    /// Read one item of probe information.
    fn identify(&mut self, info: DapInfo) -> Result<DapInfoValue, Error>;

    /// Target device vendor and name, as the probe currently reports them.
    fn target_names(&mut self) -> Result<(String, String), Error> {
        let vendor = self.identify(DapInfo::TargetDeviceVendor)?;
        let name = self.identify(DapInfo::TargetDeviceName)?;
        Ok((
            vendor.as_text().unwrap_or_default().to_owned(),
            name.as_text().unwrap_or_default().to_owned(),
        ))
    }
}

impl<T: DapTransport + ?Sized> DapTransport for &mut T {
    fn open(&mut self) -> Result<(), Error> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), Error> {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn vendor_request(&mut self, command: VendorCommand, payload: &[u8]) -> Result<Vec<u8>, Error> {
        (**self).vendor_request(command, payload)
    }

    fn assert_reset(&mut self, asserted: bool) -> Result<(), Error> {
        (**self).assert_reset(asserted)
    }

    fn identify(&mut self, info: DapInfo) -> Result<DapInfoValue, Error> {
        (**self).identify(info)
    }

    fn target_names(&mut self) -> Result<(String, String), Error> {
        (**self).target_names()
    }
}
