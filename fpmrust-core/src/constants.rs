//! Protocol constants

/// Frame start code (high byte transmitted first)
pub const START_CODE: u16 = 0xEF01;

/// Broadcast module address (factory default)
pub const BROADCAST_ADDRESS: u32 = 0xFFFF_FFFF;

/// Factory default module password
pub const DEFAULT_PASSWORD: u32 = 0x0000_0000;

/// Default reply timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Default interval between receive polls when no byte is pending (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1;

/// Factory default baud rate of the module UART
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Packet type identifiers (byte 6 of every frame)
pub mod packet_types {
    /// Command packet (host to module)
    pub const COMMAND: u8 = 0x01;

    /// Data packet
    pub const DATA: u8 = 0x02;

    /// Acknowledgement packet (module to host)
    pub const ACK: u8 = 0x07;

    /// Last data packet of a transfer
    pub const END_DATA: u8 = 0x08;
}

/// Aura LED parameter values (instruction 0x35)
pub mod led {
    pub const CONTROL_BREATHING: u8 = 0x01;
    pub const CONTROL_FLASHING: u8 = 0x02;
    pub const CONTROL_ALWAYS_ON: u8 = 0x03;
    pub const CONTROL_ALWAYS_OFF: u8 = 0x04;
    pub const CONTROL_GRADUALLY_ON: u8 = 0x05;
    pub const CONTROL_GRADUALLY_OFF: u8 = 0x06;

    pub const COLOR_RED: u8 = 0x01;
    pub const COLOR_BLUE: u8 = 0x02;
    pub const COLOR_PURPLE: u8 = 0x03;

    /// Speed used by the stock blink pattern (0x00 fastest, 0xFF slowest)
    pub const DEFAULT_SPEED: u8 = 0x60;

    /// Cycle count used by the stock blink pattern (0 = infinite)
    pub const DEFAULT_CYCLES: u8 = 0x02;
}
