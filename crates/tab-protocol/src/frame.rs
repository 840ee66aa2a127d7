//! Frame storage and field access.
//!
//! Every TAB command and reply shares one fixed layout:
//!
//! ```text
//! +------+------+-----+---------+---------+---------+---------+-------+--------+----------+
//! | 0x22 | 0x69 | len | hwid_lo | hwid_hi | msgid_lo| msgid_hi| route | opcode | payload  |
//! +------+------+-----+---------+---------+---------+---------+-------+--------+----------+
//!    0      1      2      3         4          5         6        7       8      9..len+2
//! ```
//!
//! The length field counts every byte from offset 3 through the end of the
//! payload, so the number of bytes on the wire is always `len + 3`.

use std::fmt;

use crate::constants::*;
use crate::types::{route_dst, route_src, swap_route};

/// One complete TAB frame, header plus payload, in wire layout.
///
/// The backing buffer is always the full 258 bytes; [`Frame::as_bytes`]
/// yields the prefix a transport must actually send.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    data: [u8; MAX_FRAME_SIZE],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Create a zero-filled frame.
    pub fn new() -> Self {
        Frame {
            data: [0u8; MAX_FRAME_SIZE],
        }
    }

    /// Write the two fixed start markers.
    pub fn set_start_bytes(&mut self) {
        self.data[START_BYTE_0_INDEX] = START_BYTE_0;
        self.data[START_BYTE_1_INDEX] = START_BYTE_1;
    }

    /// Get the message length field.
    pub fn msg_len(&self) -> u8 {
        self.data[MSG_LEN_INDEX]
    }

    /// Set the message length field.
    pub fn set_msg_len(&mut self, len: u8) {
        self.data[MSG_LEN_INDEX] = len;
    }

    /// Get the 16-bit hardware id (little-endian on the wire).
    pub fn hw_id(&self) -> u16 {
        u16::from_le_bytes([self.data[HWID_LSB_INDEX], self.data[HWID_MSB_INDEX]])
    }

    /// Set the 16-bit hardware id.
    pub fn set_hw_id(&mut self, hw_id: u16) {
        let bytes = hw_id.to_le_bytes();
        self.data[HWID_LSB_INDEX] = bytes[0];
        self.data[HWID_MSB_INDEX] = bytes[1];
    }

    /// Get the 16-bit message sequence id (little-endian on the wire).
    pub fn msg_id(&self) -> u16 {
        u16::from_le_bytes([self.data[MSG_ID_LSB_INDEX], self.data[MSG_ID_MSB_INDEX]])
    }

    /// Set the 16-bit message sequence id.
    pub fn set_msg_id(&mut self, msg_id: u16) {
        let bytes = msg_id.to_le_bytes();
        self.data[MSG_ID_LSB_INDEX] = bytes[0];
        self.data[MSG_ID_MSB_INDEX] = bytes[1];
    }

    /// Get the packed route byte.
    pub fn route(&self) -> u8 {
        self.data[ROUTE_INDEX]
    }

    /// Set the packed route byte.
    pub fn set_route(&mut self, route: u8) {
        self.data[ROUTE_INDEX] = route;
    }

    /// Get the source nibble of the route byte.
    pub fn route_src(&self) -> u8 {
        route_src(self.route())
    }

    /// Get the destination nibble of the route byte.
    pub fn route_dst(&self) -> u8 {
        route_dst(self.route())
    }

    /// Exchange the source and destination nibbles in place.
    pub fn swap_route(&mut self) {
        self.data[ROUTE_INDEX] = swap_route(self.data[ROUTE_INDEX]);
    }

    /// Get the raw opcode byte.
    pub fn opcode_byte(&self) -> u8 {
        self.data[OPCODE_INDEX]
    }

    /// Set the raw opcode byte.
    pub fn set_opcode_byte(&mut self, opcode: u8) {
        self.data[OPCODE_INDEX] = opcode;
    }

    /// Number of payload bytes declared by the length field.
    pub fn payload_len(&self) -> usize {
        self.msg_len().saturating_sub(MIN_MSG_LEN) as usize
    }

    /// Get the payload as declared by the length field.
    pub fn payload(&self) -> &[u8] {
        &self.data[PLD_START_INDEX..PLD_START_INDEX + self.payload_len()]
    }

    /// Get mutable access to the payload as declared by the length field.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let len = self.payload_len();
        &mut self.data[PLD_START_INDEX..PLD_START_INDEX + len]
    }

    /// Number of bytes a transport must physically send for this frame.
    pub fn byte_count(&self) -> usize {
        self.msg_len() as usize + 3
    }

    /// Get the transmittable bytes of this frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.byte_count()]
    }

    /// Get the full backing buffer, including any unused tail bytes.
    pub fn buffer(&self) -> &[u8; MAX_FRAME_SIZE] {
        &self.data
    }

    /// Write one byte at an absolute frame offset.
    pub(crate) fn set_byte(&mut self, index: usize, byte: u8) {
        self.data[index] = byte;
    }

    /// Zero-fill the backing buffer.
    pub fn zeroize(&mut self) {
        self.data = [0u8; MAX_FRAME_SIZE];
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("msg_len", &self.msg_len())
            .field("hw_id", &self.hw_id())
            .field("msg_id", &self.msg_id())
            .field("route", &self.route())
            .field("opcode", &self.opcode_byte())
            .field("payload", &self.payload())
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::decode::describe(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trip() {
        let mut frame = Frame::new();
        frame.set_start_bytes();
        frame.set_msg_len(0x06);
        frame.set_hw_id(0x1234);
        frame.set_msg_id(0xabcd);
        frame.set_route(0x02);

        assert_eq!(frame.hw_id(), 0x1234);
        assert_eq!(frame.msg_id(), 0xabcd);
        assert_eq!(frame.route(), 0x02);

        // Little-endian id fields on the wire.
        assert_eq!(frame.buffer()[HWID_LSB_INDEX], 0x34);
        assert_eq!(frame.buffer()[HWID_MSB_INDEX], 0x12);
        assert_eq!(frame.buffer()[MSG_ID_LSB_INDEX], 0xcd);
        assert_eq!(frame.buffer()[MSG_ID_MSB_INDEX], 0xab);
    }

    #[test]
    fn test_byte_count() {
        let mut frame = Frame::new();
        for len in MIN_MSG_LEN..=0xff {
            frame.set_msg_len(len);
            assert_eq!(frame.byte_count(), len as usize + 3);
            assert_eq!(frame.as_bytes().len(), len as usize + 3);
        }
    }

    #[test]
    fn test_swap_route_in_place() {
        let mut frame = Frame::new();
        frame.set_route(0x02);
        frame.swap_route();
        assert_eq!(frame.route(), 0x20);
        frame.swap_route();
        assert_eq!(frame.route(), 0x02);
    }

    #[test]
    fn test_payload_window() {
        let mut frame = Frame::new();
        frame.set_msg_len(0x08);
        frame.payload_mut().copy_from_slice(b"hi");
        assert_eq!(frame.payload(), b"hi");
    }
}
