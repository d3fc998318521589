use tracing::trace;

use crate::constants::{MAX_CHUNK_LEN, MAX_SETTINGS_SIZE};
use crate::{DapTransport, Error, VendorCommand};

/// Segmented reads and writes of an addressed memory on the probe.
///
/// A single vendor request can carry at most [`MAX_CHUNK_LEN`] data bytes, so
/// longer buffers are split into consecutive chunks. Each chunk must be
/// acknowledged with exactly its own length before the next one is sent; any
/// other answer aborts the transfer with [`Error::TransferFault`].
///
/// Addresses are sent as a single byte.
pub struct ChunkedChannel<'t, T: DapTransport + ?Sized> {
    transport: &'t mut T,
    read_command: VendorCommand,
    write_command: VendorCommand,
    capacity: usize,
}

impl<'t, T: DapTransport + ?Sized> ChunkedChannel<'t, T> {
    /// Channel onto a memory of `capacity` bytes behind a pair of vendor
    /// commands using the settings request layout.
    pub fn new(
        transport: &'t mut T,
        read_command: VendorCommand,
        write_command: VendorCommand,
        capacity: usize,
    ) -> Self {
        Self {
            transport,
            read_command,
            write_command,
            capacity,
        }
    }

    /// Channel onto the settings EEPROM.
    pub fn settings(transport: &'t mut T) -> Self {
        Self::new(
            transport,
            VendorCommand::ReadSettings,
            VendorCommand::WriteSettings,
            MAX_SETTINGS_SIZE,
        )
    }

    /// Write `bytes` starting at `base_address`, returning the number written.
    ///
    /// # Errors
    ///
    /// [`Error::TooLarge`] before anything is sent if the buffer does not fit in
    /// the memory from `base_address`, and [`Error::AddressOutOfRange`] if a
    /// chunk would start beyond address 255. [`Error::TransferFault`] if a chunk is not
    /// fully acknowledged, in which case no further chunks are sent.
    pub fn write(&mut self, base_address: u8, bytes: &[u8]) -> Result<usize, Error> {
        self.check_bounds(base_address, bytes.len())?;

        let mut address = usize::from(base_address);
        let mut pending = bytes;
        let mut written = 0;
        while !pending.is_empty() {
            let (chunk, rest) = pending.split_at(pending.len().min(MAX_CHUNK_LEN));
            let wire_address = wire_address(address)?;
            // At most MAX_CHUNK_LEN.
            let requested = chunk.len() as u8;

            let mut request = Vec::with_capacity(2 + chunk.len());
            request.push(wire_address);
            request.push(requested);
            request.extend_from_slice(chunk);
            trace!(address = wire_address, length = requested, "writing chunk");

            let response = self.request(self.write_command, &request, wire_address, requested)?;
            match response.first() {
                Some(&acknowledged) if acknowledged == requested => {}
                reported => {
                    return Err(Error::TransferFault {
                        address: wire_address,
                        requested,
                        reported: reported.copied(),
                    });
                }
            }

            address += chunk.len();
            written += chunk.len();
            pending = rest;
        }
        Ok(written)
    }

    /// Read `length` bytes starting at `base_address`.
    ///
    /// # Errors
    ///
    /// [`Error::TooLarge`] before anything is sent if the range runs past the end
    /// of the memory. [`Error::TransferFault`] if the probe declares a different
    /// length than requested for a chunk or sends fewer bytes than it declared.
    pub fn read(&mut self, base_address: u8, length: usize) -> Result<Vec<u8>, Error> {
        self.check_bounds(base_address, length)?;

        let mut address = usize::from(base_address);
        let mut out = Vec::with_capacity(length);
        while out.len() < length {
            let wire_address = wire_address(address)?;
            // At most MAX_CHUNK_LEN.
            let requested = (length - out.len()).min(MAX_CHUNK_LEN) as u8;
            trace!(address = wire_address, length = requested, "reading chunk");

            let response = self.request(
                self.read_command,
                &[wire_address, requested],
                wire_address,
                requested,
            )?;
            let fault = |reported| Error::TransferFault {
                address: wire_address,
                requested,
                reported,
            };
            let Some((&declared, payload)) = response.split_first() else {
                return Err(fault(None));
            };
            if declared != requested {
                return Err(fault(Some(declared)));
            }
            let Some(data) = payload.get(..usize::from(requested)) else {
                return Err(fault(Some(payload.len() as u8)));
            };

            out.extend_from_slice(data);
            address += usize::from(requested);
        }
        Ok(out)
    }

    /// Refuse a transfer that runs past the memory, or whose last chunk would
    /// start at an address that does not fit in a byte.
    fn check_bounds(&self, base_address: u8, length: usize) -> Result<(), Error> {
        let base = usize::from(base_address);
        let end = base + length;
        if end > self.capacity {
            return Err(Error::TooLarge {
                length: end,
                max: self.capacity,
            });
        }
        if length > 0 {
            wire_address(base + (length - 1) / MAX_CHUNK_LEN * MAX_CHUNK_LEN)?;
        }
        Ok(())
    }

    /// Send one chunk request. A timeout counts as an unacknowledged chunk.
    fn request(
        &mut self,
        command: VendorCommand,
        payload: &[u8],
        address: u8,
        requested: u8,
    ) -> Result<Vec<u8>, Error> {
        match self.transport.vendor_request(command, payload) {
            Err(Error::Timeout) => Err(Error::TransferFault {
                address,
                requested,
                reported: None,
            }),
            result => result,
        }
    }
}

fn wire_address(address: usize) -> Result<u8, Error> {
    u8::try_from(address).map_err(|_| Error::AddressOutOfRange { address })
}
