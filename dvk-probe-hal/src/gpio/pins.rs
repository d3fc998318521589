use std::str::FromStr;

use crate::Error;

/// A GPIO pin of the probe's microcontroller that the firmware lets the host drive.
///
/// GPIO23 and GPIO24 are used by the probe itself and cannot be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum GpioPin {
    Gpio00 = 0,
    Gpio01 = 1,
    Gpio02 = 2,
    Gpio03 = 3,
    Gpio04 = 4,
    Gpio05 = 5,
    Gpio06 = 6,
    Gpio07 = 7,
    Gpio08 = 8,
    Gpio09 = 9,
    Gpio10 = 10,
    Gpio11 = 11,
    Gpio12 = 12,
    Gpio13 = 13,
    Gpio14 = 14,
    Gpio15 = 15,
    Gpio16 = 16,
    Gpio17 = 17,
    Gpio18 = 18,
    Gpio19 = 19,
    Gpio20 = 20,
    Gpio21 = 21,
    Gpio22 = 22,
    Gpio25 = 25,
    Gpio26 = 26,
    Gpio27 = 27,
    Gpio28 = 28,
}

/// Every pin the firmware accepts.
pub const ALL_PINS: &[GpioPin] = {
    use GpioPin::*;
    &[
        Gpio00, Gpio01, Gpio02, Gpio03, Gpio04, Gpio05, Gpio06, Gpio07, Gpio08, Gpio09, Gpio10,
        Gpio11, Gpio12, Gpio13, Gpio14, Gpio15, Gpio16, Gpio17, Gpio18, Gpio19, Gpio20, Gpio21,
        Gpio22, Gpio25, Gpio26, Gpio27, Gpio28,
    ]
};

/// Pins routed to the DVK target header.
pub const DVK_HEADER_PINS: &[GpioPin] = {
    use GpioPin::*;
    &[
        Gpio16, Gpio17, Gpio18, Gpio19, Gpio20, Gpio21, Gpio25, Gpio26, Gpio27, Gpio28,
    ]
};

impl GpioPin {
    /// Pin number as sent to the firmware.
    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for GpioPin {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_PINS
            .iter()
            .copied()
            .find(|pin| pin.number() == value)
            .ok_or(Error::InvalidPin(value))
    }
}

impl std::fmt::Display for GpioPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GPIO{:02}", self.number())
    }
}

/// A string that does not name a probe pin.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a probe GPIO pin (expected eg `16`, `gpio16` or `GPIO_16`)")]
pub struct ParsePinError(String);

impl FromStr for GpioPin {
    type Err = ParsePinError;

    /// Parse `16`, `gpio16`, `GPIO16` or `GPIO_16`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let digits = lower.strip_prefix("gpio").unwrap_or(&lower);
        let digits = digits.strip_prefix('_').unwrap_or(digits);
        digits
            .parse::<u8>()
            .ok()
            .and_then(|n| GpioPin::try_from(n).ok())
            .ok_or_else(|| ParsePinError(s.to_owned()))
    }
}
