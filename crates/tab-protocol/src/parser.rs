//! Incremental receive parser.
//!
//! The parser consumes one byte at a time from an unbounded stream and
//! reassembles frames in place. Framing problems are handled purely by
//! resynchronization, never by error values:
//!
//! - A byte that does not match the first start marker is silently dropped;
//!   the parser keeps scanning for a marker.
//! - A mismatch at the second start marker, or a length field below 6, hard
//!   resets the parser back to marker scanning.
//!
//! The asymmetry is intentional: dropping noise bytes one at a time lets a
//! receiver lock on to the marker pair anywhere in the stream, while a bad
//! second marker means the first one was noise and everything buffered so far
//! must be discarded.

use crate::constants::*;
use crate::frame::Frame;

/// Receive parser states, one per header field plus payload and terminal
/// completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    /// Scanning for the first start marker.
    StartByte0,
    /// Expecting the second start marker.
    StartByte1,
    /// Expecting the message length field.
    MsgLen,
    /// Expecting the hardware id low byte.
    HwIdLsb,
    /// Expecting the hardware id high byte.
    HwIdMsb,
    /// Expecting the message id low byte.
    MsgIdLsb,
    /// Expecting the message id high byte.
    MsgIdMsb,
    /// Expecting the route byte.
    Route,
    /// Expecting the opcode byte.
    Opcode,
    /// Collecting payload bytes.
    Payload,
    /// A full frame is buffered; bytes are ignored until [`RxParser::clear`].
    Complete,
}

/// Incremental parser reassembling one frame at a time from a byte stream.
#[derive(Debug)]
pub struct RxParser {
    state: RxState,
    /// Next payload write position (absolute frame offset).
    cursor: usize,
    /// One past the last frame byte, derived from the length field.
    frame_end: usize,
    frame: Frame,
    resyncs: u64,
}

impl Default for RxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RxParser {
    /// Create a parser scanning for a start marker.
    pub fn new() -> Self {
        RxParser {
            state: RxState::StartByte0,
            cursor: 0,
            frame_end: 0,
            frame: Frame::new(),
            resyncs: 0,
        }
    }

    /// Get the current parser state.
    pub fn state(&self) -> RxState {
        self.state
    }

    /// Whether a complete frame is buffered.
    pub fn is_complete(&self) -> bool {
        self.state == RxState::Complete
    }

    /// Get the completed frame, or `None` while mid-frame.
    pub fn frame(&self) -> Option<&Frame> {
        if self.is_complete() {
            Some(&self.frame)
        } else {
            None
        }
    }

    /// Number of hard resets taken on framing mismatches since creation.
    pub fn resync_count(&self) -> u64 {
        self.resyncs
    }

    /// Discard all progress and return to marker scanning.
    pub fn clear(&mut self) {
        self.state = RxState::StartByte0;
        self.cursor = 0;
        self.frame_end = 0;
        self.frame.zeroize();
    }

    fn resync(&mut self, got: u8) {
        log::trace!(
            "rx resync: unexpected byte 0x{:02x} in state {:?}",
            got,
            self.state
        );
        self.resyncs += 1;
        self.clear();
    }

    /// Consume one byte from the stream.
    pub fn feed(&mut self, byte: u8) {
        match self.state {
            RxState::StartByte0 => {
                if byte == START_BYTE_0 {
                    self.frame.set_byte(START_BYTE_0_INDEX, byte);
                    self.state = RxState::StartByte1;
                }
                // Non-marker bytes are noise; keep scanning.
            }
            RxState::StartByte1 => {
                if byte == START_BYTE_1 {
                    self.frame.set_byte(START_BYTE_1_INDEX, byte);
                    self.state = RxState::MsgLen;
                } else {
                    self.resync(byte);
                }
            }
            RxState::MsgLen => {
                if byte >= MIN_MSG_LEN {
                    self.frame.set_byte(MSG_LEN_INDEX, byte);
                    self.cursor = PLD_START_INDEX;
                    self.frame_end = byte as usize + 3;
                    self.state = RxState::HwIdLsb;
                } else {
                    self.resync(byte);
                }
            }
            RxState::HwIdLsb => {
                self.frame.set_byte(HWID_LSB_INDEX, byte);
                self.state = RxState::HwIdMsb;
            }
            RxState::HwIdMsb => {
                self.frame.set_byte(HWID_MSB_INDEX, byte);
                self.state = RxState::MsgIdLsb;
            }
            RxState::MsgIdLsb => {
                self.frame.set_byte(MSG_ID_LSB_INDEX, byte);
                self.state = RxState::MsgIdMsb;
            }
            RxState::MsgIdMsb => {
                self.frame.set_byte(MSG_ID_MSB_INDEX, byte);
                self.state = RxState::Route;
            }
            RxState::Route => {
                self.frame.set_byte(ROUTE_INDEX, byte);
                self.state = RxState::Opcode;
            }
            RxState::Opcode => {
                self.frame.set_byte(OPCODE_INDEX, byte);
                if self.cursor < self.frame_end {
                    self.state = RxState::Payload;
                } else {
                    log::trace!("rx frame complete: {} bytes", self.frame.byte_count());
                    self.state = RxState::Complete;
                }
            }
            RxState::Payload => {
                self.frame.set_byte(self.cursor, byte);
                self.cursor += 1;
                if self.cursor == self.frame_end {
                    log::trace!("rx frame complete: {} bytes", self.frame.byte_count());
                    self.state = RxState::Complete;
                }
            }
            RxState::Complete => {
                // Buffered frame is immutable until the caller clears it.
            }
        }
    }

    /// Feed a slice of bytes in order. Returns true once a frame is complete;
    /// any remaining bytes in the slice are ignored by the parser.
    pub fn feed_slice(&mut self, bytes: &[u8]) -> bool {
        for &byte in bytes {
            self.feed(byte);
        }
        self.is_complete()
    }
}
