use clap::{Args, Subcommand};
use dvk_probe_hal::constants::{
    IF820_BOARD_NAME, IF820_BOARD_VENDOR, IF820_DEVICE_NAME, IF820_DEVICE_VENDOR,
};
use dvk_probe_hal::{DapTransport, Error, ProbeSession, SettingsRecord};

#[derive(Debug, Subcommand)]
pub(crate) enum SettingsCommand {
    /// Read the settings record from the EEPROM.
    Read {
        /// Print the whole settings area as hex instead of decoding it.
        #[arg(long)]
        raw: bool,
    },
    /// Write a settings record without applying it.
    ///
    /// The probe picks up the new settings the next time it boots.
    Write(RecordArgs),
    /// Write a settings record, verify it, reboot the probe and check that it
    /// reports the new target.
    Program(RecordArgs),
}

/// Fields of the settings record. The defaults describe the IF820 DVK.
#[derive(Debug, Args)]
pub(crate) struct RecordArgs {
    /// Target device vendor, at most 32 bytes.
    #[arg(long, default_value = IF820_DEVICE_VENDOR)]
    device_vendor: String,
    /// Target device name, at most 32 bytes.
    #[arg(long, default_value = IF820_DEVICE_NAME)]
    device_name: String,
    /// Target board vendor, at most 32 bytes.
    #[arg(long, default_value = IF820_BOARD_VENDOR)]
    board_vendor: String,
    /// Target board name, at most 32 bytes.
    #[arg(long, default_value = IF820_BOARD_NAME)]
    board_name: String,
}

impl From<RecordArgs> for SettingsRecord {
    fn from(value: RecordArgs) -> Self {
        SettingsRecord::new(
            value.device_vendor,
            value.device_name,
            value.board_vendor,
            value.board_name,
        )
    }
}

pub(crate) fn action<T: DapTransport>(
    session: &mut ProbeSession<T>,
    command: SettingsCommand,
) -> Result<(), Error> {
    match command {
        SettingsCommand::Read { raw: false } => println!("{:#?}", session.read_settings()?),
        SettingsCommand::Read { raw: true } => {
            for (row, bytes) in session.read_settings_raw()?.chunks(16).enumerate() {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02X}")).collect();
                println!("{:02X}: {}", row * 16, hex.join(" "));
            }
        }
        SettingsCommand::Write(args) => {
            let written = session.write_settings(&args.into())?;
            println!("Wrote {written} bytes, reboot the probe to apply them");
        }
        SettingsCommand::Program(args) => {
            session.program_settings(&args.into())?;
            println!("Settings programmed");
        }
    }
    Ok(())
}
