use clap::{Subcommand, ValueEnum};
use dvk_probe_hal::gpio::{DVK_HEADER_PINS, GpioDirection, GpioPin, LogicLevel};
use dvk_probe_hal::{DapTransport, Error, ProbeSession};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum GpioSetting {
    /// GPIO output, set high.
    #[value(aliases = ["high"])]
    OutputHigh,
    /// GPIO output, set low.
    #[value(aliases = ["low"])]
    OutputLow,
    /// GPIO input.
    #[value(aliases = ["in"])]
    Input,
}

impl GpioSetting {
    fn level(&self) -> Option<LogicLevel> {
        match self {
            GpioSetting::OutputHigh => Some(LogicLevel::High),
            GpioSetting::OutputLow => Some(LogicLevel::Low),
            GpioSetting::Input => None,
        }
    }
}

impl From<GpioSetting> for GpioDirection {
    fn from(value: GpioSetting) -> Self {
        match value {
            GpioSetting::OutputHigh | GpioSetting::OutputLow => GpioDirection::Output,
            GpioSetting::Input => GpioDirection::Input,
        }
    }
}

#[derive(Debug, Subcommand)]
pub(crate) enum GpioCommand {
    /// Read the level at one pin, or at every DVK header pin.
    Read {
        /// Pin number, eg 16 or GPIO_16.
        pin: Option<GpioPin>,
    },
    /// Configure a pin as an input or a driven output.
    Write {
        /// Pin number, eg 16 or GPIO_16.
        pin: GpioPin,
        setting: GpioSetting,
        /// Option byte sent with the direction change.
        #[arg(long, default_value_t = 0)]
        option: u8,
    },
}

pub(crate) fn action<T: DapTransport>(
    session: &mut ProbeSession<T>,
    command: GpioCommand,
) -> Result<(), Error> {
    match command {
        GpioCommand::Read { pin: Some(pin) } => {
            println!("{pin}: {:?}", session.gpio_read(pin)?);
        }
        GpioCommand::Read { pin: None } => {
            for &pin in DVK_HEADER_PINS {
                println!("{pin}: {:?}", session.gpio_read(pin)?);
            }
        }
        GpioCommand::Write {
            pin,
            setting,
            option,
        } => {
            session.gpio_set_direction_with_option(pin, setting.into(), option)?;
            if let Some(level) = setting.level() {
                session.gpio_set_level(pin, level)?;
            }
        }
    }
    Ok(())
}
