/// Items of probe information available through `DAP_Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DapInfo {
    /// Probe vendor name.
    Vendor,
    /// Probe product name.
    Product,
    /// Probe serial number.
    SerialNumber,
    /// Implemented CMSIS-DAP protocol version.
    ProtocolVersion,
    /// Vendor of the target device, from the probe's settings.
    TargetDeviceVendor,
    /// Name of the target device, from the probe's settings.
    TargetDeviceName,
    /// Vendor of the target board, from the probe's settings.
    TargetBoardVendor,
    /// Name of the target board, from the probe's settings.
    TargetBoardName,
    /// Probe firmware version.
    ProductFirmwareVersion,
    /// Supported capabilities bitmap.
    Capabilities,
    /// Test domain timer frequency.
    TestDomainTimer,
    /// UART receive buffer size.
    UartRxBufferSize,
    /// UART transmit buffer size.
    UartTxBufferSize,
    /// SWO trace buffer size.
    SwoTraceBufferSize,
    /// Maximum number of queued packets.
    PacketCount,
    /// Maximum packet size.
    PacketSize,
}

impl DapInfo {
    /// Every information item, in ID order.
    pub const ALL: [DapInfo; 16] = [
        DapInfo::Vendor,
        DapInfo::Product,
        DapInfo::SerialNumber,
        DapInfo::ProtocolVersion,
        DapInfo::TargetDeviceVendor,
        DapInfo::TargetDeviceName,
        DapInfo::TargetBoardVendor,
        DapInfo::TargetBoardName,
        DapInfo::ProductFirmwareVersion,
        DapInfo::Capabilities,
        DapInfo::TestDomainTimer,
        DapInfo::UartRxBufferSize,
        DapInfo::UartTxBufferSize,
        DapInfo::SwoTraceBufferSize,
        DapInfo::PacketCount,
        DapInfo::PacketSize,
    ];

    /// ID byte sent in the `DAP_Info` request.
    pub const fn id(self) -> u8 {
        match self {
            DapInfo::Vendor => 0x01,
            DapInfo::Product => 0x02,
            DapInfo::SerialNumber => 0x03,
            DapInfo::ProtocolVersion => 0x04,
            DapInfo::TargetDeviceVendor => 0x05,
            DapInfo::TargetDeviceName => 0x06,
            DapInfo::TargetBoardVendor => 0x07,
            DapInfo::TargetBoardName => 0x08,
            DapInfo::ProductFirmwareVersion => 0x09,
            DapInfo::Capabilities => 0xF0,
            DapInfo::TestDomainTimer => 0xF1,
            DapInfo::UartRxBufferSize => 0xFB,
            DapInfo::UartTxBufferSize => 0xFC,
            DapInfo::SwoTraceBufferSize => 0xFD,
            DapInfo::PacketCount => 0xFE,
            DapInfo::PacketSize => 0xFF,
        }
    }
}

/// Decoded `DAP_Info` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DapInfoValue {
    /// The probe does not provide this item.
    Absent,
    /// String item.
    Text(String),
    /// Single-byte item.
    Byte(u8),
    /// Two-byte item.
    Short(u16),
    /// Four-byte item.
    Word(u32),
}

impl DapInfoValue {
    /// Decode the data bytes of a `DAP_Info` response (after the length byte).
    pub(crate) fn from_response(info: DapInfo, data: &[u8]) -> Self {
        if data.is_empty() {
            return DapInfoValue::Absent;
        }
        match info {
            DapInfo::Capabilities | DapInfo::PacketCount => DapInfoValue::Byte(data[0]),
            DapInfo::PacketSize => match data {
                [low, high, ..] => DapInfoValue::Short(u16::from_le_bytes([*low, *high])),
                [low] => DapInfoValue::Short(u16::from(*low)),
                [] => DapInfoValue::Absent,
            },
            DapInfo::TestDomainTimer
            | DapInfo::UartRxBufferSize
            | DapInfo::UartTxBufferSize
            | DapInfo::SwoTraceBufferSize => {
                let mut word = [0u8; 4];
                let n = data.len().min(4);
                word[..n].copy_from_slice(&data[..n]);
                DapInfoValue::Word(u32::from_le_bytes(word))
            }
            _ => {
                // Strings are NUL-terminated and the length includes the terminator.
                let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
                DapInfoValue::Text(String::from_utf8_lossy(&data[..end]).into_owned())
            }
        }
    }

    /// The string value, if this is a string item.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DapInfoValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for DapInfoValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DapInfoValue::Absent => write!(f, "-"),
            DapInfoValue::Text(s) => write!(f, "{s}"),
            DapInfoValue::Byte(b) => write!(f, "{b:#04X}"),
            DapInfoValue::Short(s) => write!(f, "{s}"),
            DapInfoValue::Word(w) => write!(f, "{w}"),
        }
    }
}
