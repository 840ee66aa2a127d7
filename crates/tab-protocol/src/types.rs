//! Common types used in the protocol.

use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::error::ProtocolError;

/// Command opcodes carried at offset 8 of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Bootloader liveness ping.
    BootloaderPing = BOOTLOADER_PING_OPCODE,
    /// Bootloader positive acknowledgment.
    BootloaderAck = BOOTLOADER_ACK_OPCODE,
    /// Bootloader 128-byte page write addressed by subpage id.
    BootloaderWritePage = BOOTLOADER_WRITE_PAGE_OPCODE,
    /// Bootloader jump to application.
    BootloaderJump = BOOTLOADER_JUMP_OPCODE,
    /// Bootloader application-section erase.
    BootloaderErase = BOOTLOADER_ERASE_OPCODE,
    /// Bootloader power mode selection.
    BootloaderPower = BOOTLOADER_POWER_OPCODE,
    /// Bootloader negative acknowledgment.
    BootloaderNack = BOOTLOADER_NACK_OPCODE,
    /// Positive acknowledgment.
    CommonAck = COMMON_ACK_OPCODE,
    /// ASCII debug message.
    CommonDebug = COMMON_DEBUG_OPCODE,
    /// Node reboot request.
    AppReboot = APP_REBOOT_OPCODE,
    /// Spacecraft time request.
    AppGetTime = APP_GET_TIME_OPCODE,
    /// Spacecraft time set/report.
    AppSetTime = APP_SET_TIME_OPCODE,
    /// Raw data transfer.
    CommonData = COMMON_DATA_OPCODE,
    /// Telemetry request.
    AppGetTelem = APP_GET_TELEM_OPCODE,
    /// Telemetry reply.
    AppTelem = APP_TELEM_OPCODE,
    /// Extended flash write.
    CommonWriteExt = COMMON_WRITE_EXT_OPCODE,
    /// Extended flash sector erase.
    CommonEraseSectorExt = COMMON_ERASE_SECTOR_EXT_OPCODE,
    /// Extended flash read.
    CommonReadExt = COMMON_READ_EXT_OPCODE,
    /// Bootloader 128-byte page write addressed by 32-bit address.
    BootloaderWritePageAddr32 = BOOTLOADER_WRITE_PAGE_ADDR32_OPCODE,
    /// Negative acknowledgment.
    CommonNack = COMMON_NACK_OPCODE,
}

impl Opcode {
    /// Get the wire value of this opcode.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Get the diagnostic name of this opcode, matching the ground tooling
    /// output format.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::CommonAck => "common_ack",
            Opcode::CommonNack => "common_nack",
            Opcode::CommonDebug => "common_debug",
            Opcode::CommonData => "common_data",
            Opcode::CommonWriteExt => "common_write_ext",
            Opcode::CommonEraseSectorExt => "common_erase_sector_ext",
            Opcode::CommonReadExt => "common_read_ext",
            Opcode::BootloaderAck => "bootloader_ack",
            Opcode::BootloaderNack => "bootloader_nack",
            Opcode::BootloaderPing => "bootloader_ping",
            Opcode::BootloaderErase => "bootloader_erase",
            Opcode::BootloaderWritePage => "bootloader_write_page",
            Opcode::BootloaderWritePageAddr32 => "bootloader_write_page_addr32",
            Opcode::BootloaderJump => "bootloader_jump",
            Opcode::BootloaderPower => "bootloader_power",
            Opcode::AppGetTelem => "app_get_telem",
            Opcode::AppGetTime => "app_get_time",
            Opcode::AppReboot => "app_reboot",
            Opcode::AppSetTime => "app_set_time",
            Opcode::AppTelem => "app_telem",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            BOOTLOADER_PING_OPCODE => Ok(Opcode::BootloaderPing),
            BOOTLOADER_ACK_OPCODE => Ok(Opcode::BootloaderAck),
            BOOTLOADER_WRITE_PAGE_OPCODE => Ok(Opcode::BootloaderWritePage),
            BOOTLOADER_JUMP_OPCODE => Ok(Opcode::BootloaderJump),
            BOOTLOADER_ERASE_OPCODE => Ok(Opcode::BootloaderErase),
            BOOTLOADER_POWER_OPCODE => Ok(Opcode::BootloaderPower),
            BOOTLOADER_NACK_OPCODE => Ok(Opcode::BootloaderNack),
            COMMON_ACK_OPCODE => Ok(Opcode::CommonAck),
            COMMON_DEBUG_OPCODE => Ok(Opcode::CommonDebug),
            APP_REBOOT_OPCODE => Ok(Opcode::AppReboot),
            APP_GET_TIME_OPCODE => Ok(Opcode::AppGetTime),
            APP_SET_TIME_OPCODE => Ok(Opcode::AppSetTime),
            COMMON_DATA_OPCODE => Ok(Opcode::CommonData),
            APP_GET_TELEM_OPCODE => Ok(Opcode::AppGetTelem),
            APP_TELEM_OPCODE => Ok(Opcode::AppTelem),
            COMMON_WRITE_EXT_OPCODE => Ok(Opcode::CommonWriteExt),
            COMMON_ERASE_SECTOR_EXT_OPCODE => Ok(Opcode::CommonEraseSectorExt),
            COMMON_READ_EXT_OPCODE => Ok(Opcode::CommonReadExt),
            BOOTLOADER_WRITE_PAGE_ADDR32_OPCODE => Ok(Opcode::BootloaderWritePageAddr32),
            COMMON_NACK_OPCODE => Ok(Opcode::CommonNack),
            other => Err(ProtocolError::UnsupportedOpcode(other)),
        }
    }
}

/// Bus nodes addressable by a route nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Node {
    /// Ground station.
    Gnd = GND,
    /// Communications board.
    Com = COM,
    /// Command and data handling board.
    Cdh = CDH,
    /// Payload board.
    Pld = PLD,
}

impl Node {
    /// Decode a node from the low four bits of a nibble. Returns `None` for
    /// nibble values with no assigned node.
    pub fn from_nibble(nibble: u8) -> Option<Node> {
        match nibble & 0x0f {
            GND => Some(Node::Gnd),
            COM => Some(Node::Com),
            CDH => Some(Node::Cdh),
            PLD => Some(Node::Pld),
            _ => None,
        }
    }

    /// Get the route nibble for this node.
    pub fn nibble(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Gnd => write!(f, "gnd"),
            Node::Com => write!(f, "com"),
            Node::Cdh => write!(f, "cdh"),
            Node::Pld => write!(f, "pld"),
        }
    }
}

/// Pack a source and destination node into a route byte (source in the high
/// nibble, destination in the low nibble).
pub fn pack_route(src: Node, dst: Node) -> u8 {
    (src.nibble() << 4) | dst.nibble()
}

/// Extract the source nibble of a route byte.
pub fn route_src(route: u8) -> u8 {
    (route >> 4) & 0x0f
}

/// Extract the destination nibble of a route byte.
pub fn route_dst(route: u8) -> u8 {
    route & 0x0f
}

/// Exchange the source and destination nibbles of a route byte, addressing a
/// reply back to the original sender. Applying this twice yields the input.
pub fn swap_route(route: u8) -> u8 {
    ((route & 0x0f) << 4) | ((route & 0xf0) >> 4)
}

/// Render a route nibble as the node name, or `???` when unassigned.
pub fn route_nibble_name(nibble: u8) -> &'static str {
    match Node::from_nibble(nibble) {
        Some(Node::Gnd) => "gnd",
        Some(Node::Com) => "com",
        Some(Node::Cdh) => "cdh",
        Some(Node::Pld) => "pld",
        None => "???",
    }
}

/// Power modes selectable by the bootloader power opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PowerMode {
    /// Full-speed run mode.
    Run = 0x00,
    /// Sleep mode.
    Sleep = 0x01,
    /// Low-power run mode.
    LowPowerRun = 0x02,
    /// Low-power sleep mode.
    LowPowerSleep = 0x03,
    /// Stop 0 mode.
    Stop0 = 0x04,
    /// Stop 1 mode.
    Stop1 = 0x05,
    /// Stop 2 mode.
    Stop2 = 0x06,
    /// Standby mode.
    Standby = 0x07,
    /// Shutdown mode.
    Shutdown = 0x08,
}

impl PowerMode {
    /// Get the wire value of this mode.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl FromStr for PowerMode {
    type Err = ProtocolError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "run" => Ok(PowerMode::Run),
            "sleep" => Ok(PowerMode::Sleep),
            "lowpowerrun" => Ok(PowerMode::LowPowerRun),
            "lowpowersleep" => Ok(PowerMode::LowPowerSleep),
            "stop0" => Ok(PowerMode::Stop0),
            "stop1" => Ok(PowerMode::Stop1),
            "stop2" => Ok(PowerMode::Stop2),
            "standby" => Ok(PowerMode::Standby),
            "shutdown" => Ok(PowerMode::Shutdown),
            other => Err(ProtocolError::UnknownPowerMode(other.to_string())),
        }
    }
}

/// Render a bootloader ACK reason byte as its diagnostic name, or `?` when
/// unassigned.
pub fn bootloader_ack_reason_name(reason: u8) -> &'static str {
    match reason {
        BOOTLOADER_ACK_REASON_PONG => "pong",
        BOOTLOADER_ACK_REASON_ERASED => "erased",
        BOOTLOADER_ACK_REASON_JUMPED => "jump",
        _ => "?",
    }
}
