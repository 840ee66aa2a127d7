//! Outbound command builder.
//!
//! [`TxCommand`] constructs well-formed frames for any opcode from typed
//! parameters. Construction sets the header and an opcode-specific default
//! length; payload-population methods then fill in the variable parts.
//!
//! Field byte orders are deliberately mixed and must stay that way for wire
//! compatibility: flash addresses in the extended and bootloader opcodes are
//! big-endian, while the time fields of SET_TIME are little-endian like the
//! id fields of the header.

use crate::constants::*;
use crate::error::ProtocolError;
use crate::frame::Frame;
use crate::types::{pack_route, Node, Opcode, PowerMode};

/// Builder for one outbound TAB command.
#[derive(Debug, Clone)]
pub struct TxCommand {
    opcode: Opcode,
    frame: Frame,
}

impl TxCommand {
    /// Construct a command with its header fields and the default length for
    /// the given opcode.
    pub fn new(opcode: Opcode, hw_id: u16, msg_id: u16, src: Node, dst: Node) -> Self {
        let mut frame = Frame::new();
        frame.set_start_bytes();
        frame.set_hw_id(hw_id);
        frame.set_msg_id(msg_id);
        frame.set_route(pack_route(src, dst));
        frame.set_opcode_byte(opcode.code());
        frame.set_msg_len(Self::default_msg_len(opcode));
        if opcode == Opcode::CommonWriteExt {
            // Scaffold byte carried by the ground tooling's default
            // write-ext command; overwritten by `write_ext`.
            frame.set_byte(PLD_START_INDEX + 5, 0x01);
        }
        TxCommand { opcode, frame }
    }

    fn default_msg_len(opcode: Opcode) -> u8 {
        match opcode {
            Opcode::CommonWriteExt | Opcode::CommonEraseSectorExt | Opcode::CommonReadExt => 0x0b,
            Opcode::BootloaderWritePage | Opcode::BootloaderPower => 0x07,
            Opcode::BootloaderWritePageAddr32 => 0x0a,
            Opcode::AppSetTime => 0x0e,
            _ => MIN_MSG_LEN,
        }
    }

    fn require_opcode(&self, expected: Opcode) -> Result<(), ProtocolError> {
        if self.opcode == expected {
            Ok(())
        } else {
            Err(ProtocolError::OpcodeMismatch {
                expected,
                actual: self.opcode,
            })
        }
    }

    /// Get the opcode this builder was constructed with.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Populate a DEBUG command with an ASCII message.
    pub fn debug(&mut self, text: &str) -> Result<(), ProtocolError> {
        self.require_opcode(Opcode::CommonDebug)?;
        let bytes = text.as_bytes();
        if bytes.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: bytes.len(),
            });
        }
        self.frame.set_msg_len(MIN_MSG_LEN + bytes.len() as u8);
        self.frame.payload_mut().copy_from_slice(bytes);
        Ok(())
    }

    /// Populate a DATA command with raw bytes.
    pub fn data(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        self.require_opcode(Opcode::CommonData)?;
        if bytes.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: bytes.len(),
            });
        }
        self.frame.set_msg_len(MIN_MSG_LEN + bytes.len() as u8);
        self.frame.payload_mut().copy_from_slice(bytes);
        Ok(())
    }

    /// Populate a WRITE_EXT command: flash id byte, big-endian 32-bit address,
    /// then raw data bytes.
    pub fn write_ext(&mut self, addr: u32, data: &[u8], flash_id: u8) -> Result<(), ProtocolError> {
        self.require_opcode(Opcode::CommonWriteExt)?;
        if data.len() > MAX_PAYLOAD_SIZE - 5 {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE - 5,
                actual: data.len(),
            });
        }
        self.frame.set_msg_len(0x0b + data.len() as u8);
        let payload = self.frame.payload_mut();
        payload[0] = flash_id;
        payload[1..5].copy_from_slice(&addr.to_be_bytes());
        payload[5..5 + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Populate an ERASE_SECTOR_EXT command: flash id byte plus big-endian
    /// 32-bit sector address.
    pub fn erase_sector_ext(&mut self, addr: u32, flash_id: u8) -> Result<(), ProtocolError> {
        self.require_opcode(Opcode::CommonEraseSectorExt)?;
        self.frame.set_msg_len(0x0b);
        let payload = self.frame.payload_mut();
        payload[0] = flash_id;
        payload[1..5].copy_from_slice(&addr.to_be_bytes());
        Ok(())
    }

    /// Populate a READ_EXT command: flash id byte, big-endian 32-bit address,
    /// and a one-byte requested length.
    pub fn read_ext(&mut self, addr: u32, data_length: u8, flash_id: u8) -> Result<(), ProtocolError> {
        self.require_opcode(Opcode::CommonReadExt)?;
        self.frame.set_msg_len(0x0c);
        let payload = self.frame.payload_mut();
        payload[0] = flash_id;
        payload[1..5].copy_from_slice(&addr.to_be_bytes());
        payload[5] = data_length;
        Ok(())
    }

    /// Populate a bootloader WRITE_PAGE command: subpage id byte plus exactly
    /// one 128-byte page of data.
    pub fn bootloader_write_page(
        &mut self,
        page_number: u8,
        page_data: &[u8],
    ) -> Result<(), ProtocolError> {
        self.require_opcode(Opcode::BootloaderWritePage)?;
        if page_data.len() != BOOTLOADER_PAGE_SIZE {
            return Err(ProtocolError::InvalidPageSize {
                expected: BOOTLOADER_PAGE_SIZE,
                actual: page_data.len(),
            });
        }
        self.frame.set_msg_len(0x87);
        let payload = self.frame.payload_mut();
        payload[0] = page_number;
        payload[1..1 + BOOTLOADER_PAGE_SIZE].copy_from_slice(page_data);
        Ok(())
    }

    /// Populate a bootloader WRITE_PAGE_ADDR32 command: big-endian 32-bit
    /// target address plus exactly one 128-byte page of data.
    pub fn bootloader_write_page_addr32(
        &mut self,
        addr: u32,
        page_data: &[u8],
    ) -> Result<(), ProtocolError> {
        self.require_opcode(Opcode::BootloaderWritePageAddr32)?;
        if page_data.len() != BOOTLOADER_PAGE_SIZE {
            return Err(ProtocolError::InvalidPageSize {
                expected: BOOTLOADER_PAGE_SIZE,
                actual: page_data.len(),
            });
        }
        self.frame.set_msg_len(0x8a);
        let payload = self.frame.payload_mut();
        payload[0..4].copy_from_slice(&addr.to_be_bytes());
        payload[4..4 + BOOTLOADER_PAGE_SIZE].copy_from_slice(page_data);
        Ok(())
    }

    /// Populate a bootloader POWER command with the selected mode.
    pub fn power_select(&mut self, mode: PowerMode) -> Result<(), ProtocolError> {
        self.require_opcode(Opcode::BootloaderPower)?;
        self.frame.set_msg_len(0x07);
        self.frame.payload_mut()[0] = mode.code();
        Ok(())
    }

    /// Populate a SET_TIME command: little-endian 32-bit seconds then
    /// little-endian 32-bit nanoseconds since the spacecraft epoch.
    pub fn set_time(&mut self, seconds: u32, nanoseconds: u32) -> Result<(), ProtocolError> {
        self.require_opcode(Opcode::AppSetTime)?;
        self.frame.set_msg_len(0x0e);
        let payload = self.frame.payload_mut();
        payload[0..4].copy_from_slice(&seconds.to_le_bytes());
        payload[4..8].copy_from_slice(&nanoseconds.to_le_bytes());
        Ok(())
    }

    /// Number of bytes a transport must physically send for this command.
    pub fn byte_count(&self) -> usize {
        self.frame.byte_count()
    }

    /// Get the transmittable bytes of this command.
    pub fn as_bytes(&self) -> &[u8] {
        self.frame.as_bytes()
    }

    /// Borrow the underlying frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Take the underlying frame.
    pub fn into_frame(self) -> Frame {
        self.frame
    }

    /// Zero the payload and restore the constructed header and default
    /// length, leaving the builder ready to repopulate.
    pub fn clear(&mut self) {
        *self = TxCommand::new(
            self.opcode,
            self.frame.hw_id(),
            self.frame.msg_id(),
            // Route nibbles survive a clear exactly as constructed.
            match Node::from_nibble(self.frame.route_src()) {
                Some(node) => node,
                None => Node::Gnd,
            },
            match Node::from_nibble(self.frame.route_dst()) {
                Some(node) => node,
                None => Node::Gnd,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_ext_layout() {
        let mut cmd = TxCommand::new(Opcode::CommonWriteExt, 0x0012, 0x0001, Node::Gnd, Node::Cdh);
        cmd.write_ext(0x0000_0100, &[0xaa, 0xbb], FLASH1).expect("fits");

        assert_eq!(cmd.frame().msg_len(), 0x0d);
        assert_eq!(
            cmd.frame().payload(),
            &[0x00, 0x00, 0x00, 0x01, 0x00, 0xaa, 0xbb]
        );
    }

    #[test]
    fn test_write_ext_default_scaffold() {
        let cmd = TxCommand::new(Opcode::CommonWriteExt, 0, 0, Node::Gnd, Node::Cdh);
        assert_eq!(cmd.frame().msg_len(), 0x0b);
        assert_eq!(cmd.frame().buffer()[PLD_START_INDEX + 5], 0x01);
    }

    #[test]
    fn test_debug_payload() {
        let mut cmd = TxCommand::new(Opcode::CommonDebug, 0x0012, 0x0001, Node::Gnd, Node::Cdh);
        cmd.debug("hi").expect("fits");
        assert_eq!(cmd.frame().msg_len(), 0x08);
        assert_eq!(cmd.frame().payload(), b"hi");
        assert_eq!(cmd.byte_count(), 0x08 + 3);
    }

    #[test]
    fn test_debug_too_long() {
        let mut cmd = TxCommand::new(Opcode::CommonDebug, 0, 0, Node::Gnd, Node::Cdh);
        let text = "x".repeat(MAX_PAYLOAD_SIZE + 1);
        assert_eq!(
            cmd.debug(&text),
            Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: MAX_PAYLOAD_SIZE + 1,
            })
        );
        // Failed setters leave the frame untouched.
        assert_eq!(cmd.frame().msg_len(), MIN_MSG_LEN);
    }

    #[test]
    fn test_setter_opcode_mismatch() {
        let mut cmd = TxCommand::new(Opcode::CommonAck, 0, 0, Node::Gnd, Node::Cdh);
        assert_eq!(
            cmd.debug("nope"),
            Err(ProtocolError::OpcodeMismatch {
                expected: Opcode::CommonDebug,
                actual: Opcode::CommonAck,
            })
        );
    }

    #[test]
    fn test_power_select_shutdown() {
        let mut cmd = TxCommand::new(Opcode::BootloaderPower, 0, 0, Node::Gnd, Node::Cdh);
        cmd.power_select(PowerMode::Shutdown).expect("power opcode");
        assert_eq!(cmd.frame().msg_len(), 0x07);
        assert_eq!(cmd.frame().payload()[0], 0x08);
    }

    #[test]
    fn test_read_ext_layout() {
        let mut cmd = TxCommand::new(Opcode::CommonReadExt, 0, 0, Node::Gnd, Node::Cdh);
        cmd.read_ext(0xdead_beef, 0x40, FLASH1).expect("read opcode");
        assert_eq!(cmd.frame().msg_len(), 0x0c);
        assert_eq!(
            cmd.frame().payload(),
            &[0x00, 0xde, 0xad, 0xbe, 0xef, 0x40]
        );
    }

    #[test]
    fn test_erase_sector_ext_layout() {
        let mut cmd = TxCommand::new(Opcode::CommonEraseSectorExt, 0, 0, Node::Gnd, Node::Cdh);
        cmd.erase_sector_ext(0x0001_0000, FLASH1).expect("erase opcode");
        assert_eq!(cmd.frame().msg_len(), 0x0b);
        assert_eq!(cmd.frame().payload(), &[0x00, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_bootloader_write_page_requires_full_page() {
        let mut cmd = TxCommand::new(Opcode::BootloaderWritePage, 0, 0, Node::Gnd, Node::Cdh);
        assert_eq!(
            cmd.bootloader_write_page(3, &[0u8; 64]),
            Err(ProtocolError::InvalidPageSize {
                expected: BOOTLOADER_PAGE_SIZE,
                actual: 64,
            })
        );

        let page = [0x5a; BOOTLOADER_PAGE_SIZE];
        cmd.bootloader_write_page(3, &page).expect("full page");
        assert_eq!(cmd.frame().msg_len(), 0x87);
        assert_eq!(cmd.frame().payload()[0], 3);
        assert_eq!(&cmd.frame().payload()[1..], &page[..]);
    }

    #[test]
    fn test_bootloader_write_page_addr32_layout() {
        let mut cmd = TxCommand::new(
            Opcode::BootloaderWritePageAddr32,
            0,
            0,
            Node::Gnd,
            Node::Cdh,
        );
        let page = [0xa5; BOOTLOADER_PAGE_SIZE];
        cmd.bootloader_write_page_addr32(0x0800_0000, &page)
            .expect("full page");
        assert_eq!(cmd.frame().msg_len(), 0x8a);
        assert_eq!(&cmd.frame().payload()[0..4], &[0x08, 0x00, 0x00, 0x00]);
        assert_eq!(&cmd.frame().payload()[4..], &page[..]);
    }

    #[test]
    fn test_set_time_little_endian() {
        let mut cmd = TxCommand::new(Opcode::AppSetTime, 0, 0, Node::Cdh, Node::Gnd);
        cmd.set_time(0x0102_0304, 0x0a0b_0c0d).expect("set-time opcode");
        assert_eq!(cmd.frame().msg_len(), 0x0e);
        assert_eq!(
            cmd.frame().payload(),
            &[0x04, 0x03, 0x02, 0x01, 0x0d, 0x0c, 0x0b, 0x0a]
        );
    }

    #[test]
    fn test_header_construction() {
        let cmd = TxCommand::new(Opcode::CommonAck, 0x1234, 0x5678, Node::Com, Node::Pld);
        let frame = cmd.frame();
        assert_eq!(frame.as_bytes()[0], START_BYTE_0);
        assert_eq!(frame.as_bytes()[1], START_BYTE_1);
        assert_eq!(frame.hw_id(), 0x1234);
        assert_eq!(frame.msg_id(), 0x5678);
        assert_eq!(frame.route(), 0x13);
        assert_eq!(frame.msg_len(), MIN_MSG_LEN);
    }

    #[test]
    fn test_clear_restores_defaults() {
        let mut cmd = TxCommand::new(Opcode::CommonDebug, 0x0012, 0x0001, Node::Gnd, Node::Cdh);
        cmd.debug("scratch").expect("fits");
        cmd.clear();
        assert_eq!(cmd.frame().msg_len(), MIN_MSG_LEN);
        assert_eq!(cmd.frame().hw_id(), 0x0012);
        assert_eq!(cmd.frame().route(), 0x02);
        assert_eq!(cmd.as_bytes()[0], START_BYTE_0);
    }
}
