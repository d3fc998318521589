#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![deny(unsafe_code)]

mod channel;
mod commands;
pub mod constants;
pub mod discovery;
mod error;
pub mod gpio;
mod info;
pub mod ports;
mod session;
mod settings;
mod transport;

#[cfg(test)]
mod fake;

pub use channel::ChunkedChannel;
pub use commands::VendorCommand;
pub use error::Error;
pub use info::{DapInfo, DapInfoValue};
pub use session::{ProbeSession, SessionConfig, SessionState, is_claimed};
pub use settings::SettingsRecord;
pub use transport::{DapTransport, HidTransport};
