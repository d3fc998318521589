#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// GPIO pin level.
pub enum LogicLevel {
    /// Logic high.
    High,
    /// Logic low.
    Low,
}

impl LogicLevel {
    /// Returns true if the level is high.
    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    /// Returns true if the level is low.
    pub fn is_low(self) -> bool {
        matches!(self, Self::Low)
    }
}

impl From<bool> for LogicLevel {
    fn from(value: bool) -> Self {
        if value { Self::High } else { Self::Low }
    }
}

impl From<LogicLevel> for u8 {
    /// Convert a [`LogicLevel`] to 1 (if high) or 0 (if low).
    fn from(value: LogicLevel) -> Self {
        match value {
            LogicLevel::High => 1,
            LogicLevel::Low => 0,
        }
    }
}

impl TryFrom<u8> for LogicLevel {
    type Error = u8;

    /// Parse a level byte from the probe, returning the byte if it is not 0 or 1.
    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::High),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// GPIO pin direction.
pub enum GpioDirection {
    /// Digital input.
    Input,
    /// Digital output.
    Output,
}

impl From<GpioDirection> for u8 {
    /// Convert a [`GpioDirection`] to 0 (if input) or 1 (if output).
    fn from(value: GpioDirection) -> Self {
        match value {
            GpioDirection::Input => 0,
            GpioDirection::Output => 1,
        }
    }
}

