//! Protocol constants
//!
//! These constants define the opcode values, frame field offsets, and other
//! wire-level values used by the TAB command/telemetry link protocol.

// ============================================================================
// Frame Sizing
// ============================================================================

/// Maximum size of a complete frame in bytes.
pub const MAX_FRAME_SIZE: usize = 258;
/// Maximum size of a frame payload in bytes.
pub const MAX_PAYLOAD_SIZE: usize = 249;
/// Smallest legal value of the length field (a frame always carries the six
/// header bytes counted by it).
pub const MIN_MSG_LEN: u8 = 0x06;

// ============================================================================
// Start Markers
// ============================================================================

/// First start marker byte of every frame.
pub const START_BYTE_0: u8 = 0x22;
/// Second start marker byte of every frame.
pub const START_BYTE_1: u8 = 0x69;

// ============================================================================
// Frame Field Offsets
// ============================================================================

/// Offset of the first start marker.
pub const START_BYTE_0_INDEX: usize = 0;
/// Offset of the second start marker.
pub const START_BYTE_1_INDEX: usize = 1;
/// Offset of the message length field.
pub const MSG_LEN_INDEX: usize = 2;
/// Offset of the hardware id low byte.
pub const HWID_LSB_INDEX: usize = 3;
/// Offset of the hardware id high byte.
pub const HWID_MSB_INDEX: usize = 4;
/// Offset of the message id low byte.
pub const MSG_ID_LSB_INDEX: usize = 5;
/// Offset of the message id high byte.
pub const MSG_ID_MSB_INDEX: usize = 6;
/// Offset of the packed source/destination route byte.
pub const ROUTE_INDEX: usize = 7;
/// Offset of the opcode byte.
pub const OPCODE_INDEX: usize = 8;
/// Offset of the first payload byte.
pub const PLD_START_INDEX: usize = 9;

// ============================================================================
// Opcodes (common, application, bootloader)
// ============================================================================

/// Positive acknowledgment.
pub const COMMON_ACK_OPCODE: u8 = 0x10;
/// Negative acknowledgment.
pub const COMMON_NACK_OPCODE: u8 = 0xff;
/// ASCII debug message, echoed by the receiver.
pub const COMMON_DEBUG_OPCODE: u8 = 0x11;
/// Raw data transfer into the common data buffer.
pub const COMMON_DATA_OPCODE: u8 = 0x16;
/// Extended flash write (flash id + 32-bit address + data).
pub const COMMON_WRITE_EXT_OPCODE: u8 = 0x1a;
/// Extended flash sector erase (flash id + 32-bit address).
pub const COMMON_ERASE_SECTOR_EXT_OPCODE: u8 = 0x1b;
/// Extended flash read (flash id + 32-bit address + requested length).
pub const COMMON_READ_EXT_OPCODE: u8 = 0x1c;
/// Request the telemetry frame.
pub const APP_GET_TELEM_OPCODE: u8 = 0x17;
/// Request the current spacecraft time.
pub const APP_GET_TIME_OPCODE: u8 = 0x13;
/// Request a node reboot.
pub const APP_REBOOT_OPCODE: u8 = 0x12;
/// Set (or report) the spacecraft time.
pub const APP_SET_TIME_OPCODE: u8 = 0x14;
/// Telemetry frame reply.
pub const APP_TELEM_OPCODE: u8 = 0x18;
/// Bootloader positive acknowledgment.
pub const BOOTLOADER_ACK_OPCODE: u8 = 0x01;
/// Bootloader negative acknowledgment.
pub const BOOTLOADER_NACK_OPCODE: u8 = 0x0f;
/// Bootloader liveness ping.
pub const BOOTLOADER_PING_OPCODE: u8 = 0x00;
/// Bootloader application-section erase.
pub const BOOTLOADER_ERASE_OPCODE: u8 = 0x0c;
/// Bootloader 128-byte page write addressed by subpage id.
pub const BOOTLOADER_WRITE_PAGE_OPCODE: u8 = 0x02;
/// Bootloader 128-byte page write addressed by 32-bit address.
pub const BOOTLOADER_WRITE_PAGE_ADDR32_OPCODE: u8 = 0x20;
/// Bootloader jump to application.
pub const BOOTLOADER_JUMP_OPCODE: u8 = 0x0b;
/// Bootloader power mode selection.
pub const BOOTLOADER_POWER_OPCODE: u8 = 0x0d;

// ============================================================================
// Route Nibble Ids
// ============================================================================

/// Ground station node id.
pub const GND: u8 = 0x00;
/// Communications node id.
pub const COM: u8 = 0x01;
/// Command and data handling node id.
pub const CDH: u8 = 0x02;
/// Payload node id.
pub const PLD: u8 = 0x03;

// ============================================================================
// Flash Ids
// ============================================================================

/// Default flash device selector for the extended flash opcodes.
pub const FLASH1: u8 = 0x00;

// ============================================================================
// Bootloader ACK Reason Codes
// ============================================================================

/// Reply to a bootloader ping.
pub const BOOTLOADER_ACK_REASON_PONG: u8 = 0x00;
/// Application section erased.
pub const BOOTLOADER_ACK_REASON_ERASED: u8 = 0x01;
/// Jumped to the application.
pub const BOOTLOADER_ACK_REASON_JUMPED: u8 = 0xff;

// ============================================================================
// Bootloader Page Writes
// ============================================================================

/// Exact page size required by the bootloader write-page opcodes.
pub const BOOTLOADER_PAGE_SIZE: usize = 128;
