//! GPIO pins of the probe.

mod common;
mod digital;
mod pins;

pub use common::{GpioDirection, LogicLevel};
pub use digital::{Input, Output};
pub use pins::{ALL_PINS, DVK_HEADER_PINS, GpioPin, ParsePinError};
