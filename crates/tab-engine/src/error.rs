//! Engine error types.

use thiserror::Error;

/// Errors that can occur while generating a reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    /// The inbound frame carries an opcode byte with no assigned meaning, so
    /// no reply can be produced. The caller decides whether to drop the
    /// frame or raise the failure out of band.
    #[error("unsupported inbound opcode: 0x{0:02x}")]
    UnsupportedOpcode(u8),
}
