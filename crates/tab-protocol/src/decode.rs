//! Diagnostic frame-to-text decoder.
//!
//! [`describe`] renders any frame's bytes as a human-readable line for
//! logging, mirroring the output format of the ground tooling. It is a
//! best-effort, read-only view: it never fails, never mutates, and clamps
//! every payload access to the bytes actually present, so truncated or
//! malformed buffers decode to partial text instead of panicking.

use std::fmt::Write;

use crate::constants::*;
use crate::types::{bootloader_ack_reason_name, route_dst, route_nibble_name, route_src, Opcode};

/// Byte at an absolute offset, or zero past the end of the buffer.
fn byte_at(data: &[u8], index: usize) -> u8 {
    data.get(index).copied().unwrap_or(0)
}

/// Big-endian 32-bit field starting at an absolute offset.
fn be32_at(data: &[u8], index: usize) -> u32 {
    u32::from_be_bytes([
        byte_at(data, index),
        byte_at(data, index + 1),
        byte_at(data, index + 2),
        byte_at(data, index + 3),
    ])
}

/// Little-endian 32-bit field starting at an absolute offset.
fn le32_at(data: &[u8], index: usize) -> u32 {
    u32::from_le_bytes([
        byte_at(data, index),
        byte_at(data, index + 1),
        byte_at(data, index + 2),
        byte_at(data, index + 3),
    ])
}

/// Payload bytes from a relative offset to the end declared by the length
/// field, clamped to the bytes present in the buffer.
fn payload_window(data: &[u8], from: usize) -> &[u8] {
    let declared_end = (byte_at(data, MSG_LEN_INDEX) as usize + 3).min(data.len());
    let start = (PLD_START_INDEX + from).min(declared_end);
    &data[start..declared_end]
}

/// Render a frame's bytes as a human-readable description.
///
/// Dispatches on the opcode byte to produce an opcode name plus an
/// opcode-specific payload description, followed by the common hardware id,
/// message id, and route fields. Unknown opcodes render as `?` with no
/// payload description.
pub fn describe(data: &[u8]) -> String {
    let mut out = String::new();
    let msg_len = byte_at(data, MSG_LEN_INDEX);

    match Opcode::try_from(byte_at(data, OPCODE_INDEX)) {
        Ok(opcode) => {
            out.push_str(opcode.name());
            match opcode {
                Opcode::CommonDebug => {
                    out.push_str(" \"");
                    for &byte in payload_window(data, 0) {
                        out.push(byte as char);
                    }
                    out.push('"');
                }
                Opcode::CommonData => {
                    out.push_str(" Data:");
                    for &byte in payload_window(data, 0) {
                        let _ = write!(out, " 0x{:02x}", byte);
                    }
                }
                Opcode::CommonWriteExt => {
                    let _ = write!(out, " Address: 0x{:08x}", be32_at(data, PLD_START_INDEX + 1));
                    out.push_str(" Data:");
                    for &byte in payload_window(data, 5) {
                        let _ = write!(out, " 0x{:02x}", byte);
                    }
                }
                Opcode::CommonEraseSectorExt => {
                    let _ = write!(out, " Address: 0x{:08x}", be32_at(data, PLD_START_INDEX + 1));
                }
                Opcode::CommonReadExt => {
                    let _ = write!(out, " Address: 0x{:08x}", be32_at(data, PLD_START_INDEX + 1));
                    let _ = write!(out, " Length: 0x{:02x}", byte_at(data, PLD_START_INDEX + 5));
                }
                Opcode::BootloaderAck => {
                    // A one-byte payload carries a reason code, a four-byte
                    // payload carries the jump address.
                    if msg_len == 0x07 {
                        let reason = byte_at(data, PLD_START_INDEX);
                        let _ = write!(
                            out,
                            " reason:0x{:02x}({})",
                            reason,
                            bootloader_ack_reason_name(reason)
                        );
                    }
                    if msg_len == 0x0a {
                        let _ = write!(
                            out,
                            " reason:0x{:08x}(addr)",
                            be32_at(data, PLD_START_INDEX)
                        );
                    }
                }
                Opcode::BootloaderWritePage => {
                    let _ = write!(out, " subpage_id:{}", byte_at(data, PLD_START_INDEX));
                    if msg_len == 0x87 {
                        out.push_str(" hex_data:");
                        for &byte in payload_window(data, 1) {
                            let _ = write!(out, "{:02x}", byte);
                        }
                    }
                }
                Opcode::BootloaderWritePageAddr32 => {
                    let _ = write!(out, " Address: 0x{:08x}", be32_at(data, PLD_START_INDEX));
                    if msg_len == 0x8a {
                        out.push_str(" hex_data:");
                        for &byte in payload_window(data, 4) {
                            let _ = write!(out, "{:02x}", byte);
                        }
                    }
                }
                Opcode::AppSetTime => {
                    let sec = le32_at(data, PLD_START_INDEX);
                    let ns = le32_at(data, PLD_START_INDEX + 4);
                    let _ = write!(out, " sec:{} ns:{}", sec, ns);
                }
                _ => {}
            }
        }
        Err(_) => out.push('?'),
    }

    let hw_id = u16::from_le_bytes([byte_at(data, HWID_LSB_INDEX), byte_at(data, HWID_MSB_INDEX)]);
    let msg_id =
        u16::from_le_bytes([byte_at(data, MSG_ID_LSB_INDEX), byte_at(data, MSG_ID_MSB_INDEX)]);
    let route = byte_at(data, ROUTE_INDEX);
    let _ = write!(out, " hw_id:0x{:04x}", hw_id);
    let _ = write!(out, " msg_id:0x{:04x}", msg_id);
    let _ = write!(out, " src:{}", route_nibble_name(route_src(route)));
    let _ = write!(out, " dst:{}", route_nibble_name(route_dst(route)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::TxCommand;
    use crate::types::{Node, Opcode};

    #[test]
    fn test_describe_ack() {
        let cmd = TxCommand::new(Opcode::CommonAck, 0x0012, 0x0001, Node::Gnd, Node::Cdh);
        assert_eq!(
            describe(cmd.as_bytes()),
            "common_ack hw_id:0x0012 msg_id:0x0001 src:gnd dst:cdh"
        );
    }

    #[test]
    fn test_describe_debug() {
        let mut cmd = TxCommand::new(Opcode::CommonDebug, 0x0012, 0x0001, Node::Cdh, Node::Gnd);
        cmd.debug("hello").expect("fits");
        assert_eq!(
            describe(cmd.as_bytes()),
            "common_debug \"hello\" hw_id:0x0012 msg_id:0x0001 src:cdh dst:gnd"
        );
    }

    #[test]
    fn test_describe_write_ext() {
        let mut cmd = TxCommand::new(Opcode::CommonWriteExt, 0x0012, 0x0001, Node::Gnd, Node::Cdh);
        cmd.write_ext(0x0000_0100, &[0xaa, 0xbb], FLASH1).expect("fits");
        assert_eq!(
            describe(cmd.as_bytes()),
            "common_write_ext Address: 0x00000100 Data: 0xaa 0xbb \
             hw_id:0x0012 msg_id:0x0001 src:gnd dst:cdh"
        );
    }

    #[test]
    fn test_describe_read_ext() {
        let mut cmd = TxCommand::new(Opcode::CommonReadExt, 0x0001, 0x0002, Node::Gnd, Node::Cdh);
        cmd.read_ext(0xdead_beef, 0x10, FLASH1).expect("fits");
        assert_eq!(
            describe(cmd.as_bytes()),
            "common_read_ext Address: 0xdeadbeef Length: 0x10 \
             hw_id:0x0001 msg_id:0x0002 src:gnd dst:cdh"
        );
    }

    #[test]
    fn test_describe_set_time() {
        let mut cmd = TxCommand::new(Opcode::AppSetTime, 0x0001, 0x0002, Node::Cdh, Node::Gnd);
        cmd.set_time(1000, 500).expect("fits");
        assert_eq!(
            describe(cmd.as_bytes()),
            "app_set_time sec:1000 ns:500 hw_id:0x0001 msg_id:0x0002 src:cdh dst:gnd"
        );
    }

    #[test]
    fn test_describe_bootloader_ack_reason() {
        // Hand-built frame: bootloader ACK with a pong reason byte.
        let bytes = [
            START_BYTE_0,
            START_BYTE_1,
            0x07,
            0x12,
            0x00,
            0x01,
            0x00,
            0x20,
            BOOTLOADER_ACK_OPCODE,
            BOOTLOADER_ACK_REASON_PONG,
        ];
        assert_eq!(
            describe(&bytes),
            "bootloader_ack reason:0x00(pong) hw_id:0x0012 msg_id:0x0001 src:cdh dst:gnd"
        );
    }

    #[test]
    fn test_describe_unknown_opcode() {
        let bytes = [
            START_BYTE_0,
            START_BYTE_1,
            0x06,
            0x12,
            0x00,
            0x01,
            0x00,
            0x0e,
            0x42,
        ];
        assert_eq!(
            describe(&bytes),
            "? hw_id:0x0012 msg_id:0x0001 src:gnd dst:???"
        );
    }

    #[test]
    fn test_describe_is_total_over_malformed_input() {
        // Truncated, empty, and garbage buffers all decode to some text.
        assert!(!describe(&[]).is_empty());
        assert!(!describe(&[0x22]).is_empty());
        let mut garbage = [0xffu8; 258];
        garbage[MSG_LEN_INDEX] = 0xff;
        assert!(!describe(&garbage).is_empty());
        // A declared length larger than the buffer must clamp, not panic.
        let short = [0x22, 0x69, 0xff, 0x00, 0x00, 0x00, 0x00, 0x02, 0x11, b'h'];
        let text = describe(&short);
        assert!(text.starts_with("common_debug \"h\""));
    }
}
