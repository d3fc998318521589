use crate::gpio::GpioCommand;
use crate::settings::SettingsCommand;

use clap::{ArgAction, Parser, Subcommand};

/// CLI for the DVK Probe CMSIS-DAP adapter
///
/// Lists connected probes with their shell and data serial ports, drives the
/// probe's GPIO pins, and reads or programs the settings record that tells the
/// probe which target device and board it is fitted to.
///
/// When several probes are connected, choose one with --probe (or the
/// DVK_PROBE_ID environment variable) using the ID shown by the list command.
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// Unique ID (USB serial number) of the probe to use
    #[arg(short, long, env = "DVK_PROBE_ID", global = true)]
    pub(crate) probe: Option<String>,
    /// Log more detail, repeat for trace output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// List connected probes and their serial ports.
    List {
        /// Also connect to each one and show the board it is fitted to.
        #[arg(short, long)]
        details: bool,
    },
    /// Show the probe's CMSIS-DAP information.
    Info,
    /// Read or drive GPIO pins.
    #[command(subcommand)]
    Gpio(GpioCommand),
    /// Read, write or program the settings EEPROM.
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Reboot the probe.
    Reboot {
        /// Reboot into the bootloader for a firmware update.
        #[arg(long)]
        bootloader: bool,
    },
    /// Pulse the target's reset line.
    Reset,
}
