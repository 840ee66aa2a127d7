//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when building or interpreting TAB commands.
///
/// Framing problems on the receive path are deliberately absent here: the
/// receive parser recovers from bad markers and bad lengths by
/// resynchronization and never surfaces them as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A payload-population method was called on a builder constructed for a
    /// different opcode.
    #[error("opcode mismatch: builder holds {actual:?}, setter requires {expected:?}")]
    OpcodeMismatch {
        /// Opcode the setter services.
        expected: crate::Opcode,
        /// Opcode the builder was constructed with.
        actual: crate::Opcode,
    },

    /// Payload data exceeds the frame payload capacity.
    #[error("payload too large: maximum {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Maximum payload bytes available for this command.
        max: usize,
        /// Bytes supplied by the caller.
        actual: usize,
    },

    /// Bootloader page data is not exactly one page.
    #[error("invalid page size: expected {expected} bytes, got {actual}")]
    InvalidPageSize {
        /// Required page size.
        expected: usize,
        /// Bytes supplied by the caller.
        actual: usize,
    },

    /// Opcode byte has no assigned meaning.
    #[error("unsupported opcode: 0x{0:02x}")]
    UnsupportedOpcode(u8),

    /// Power mode name does not match any enumerated mode.
    #[error("unknown power mode: {0:?}")]
    UnknownPowerMode(String),
}
