//! Reply generation for completed inbound frames.
//!
//! [`ReplyEngine`] implements the application-mode opcode dispatch table:
//! given a completed inbound frame, it produces the outbound reply frame,
//! driving the data accumulator and the injected collaborators where the
//! opcode calls for them.
//!
//! Every reply copies the hardware and message ids verbatim and swaps the
//! route nibbles so the reply addresses back to the original sender. The
//! bootloader opcodes are always negative-acknowledged here: a running
//! application never performs bootloader actions in the dual-firmware
//! architecture, and the extended flash path is likewise not serviced.

use tab_protocol::{swap_route, Frame, Opcode, MIN_MSG_LEN};

use crate::accumulator::{DataAccumulator, DataSink, DiscardSink};
use crate::clock::{epoch_elapsed, Clock, SystemClock};
use crate::error::ReplyError;

/// Length of a GET_TELEM reply.
const TELEM_MSG_LEN: u8 = 0x54;
/// Length of a GET_TIME reply (SET_TIME carrier with an 8-byte payload).
const TIME_MSG_LEN: u8 = 0x0e;
/// Reason byte carried by the NACK reply to an inbound POWER command.
const POWER_NACK_REASON: u8 = 0x01;

/// Collaborator supplying telemetry payload content for GET_TELEM replies.
pub trait TelemetrySource {
    /// Fill the zero-initialized telemetry payload window.
    fn sample(&mut self, buf: &mut [u8]);
}

/// Stock telemetry source that leaves the payload zero-filled.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroTelemetry;

impl TelemetrySource for ZeroTelemetry {
    fn sample(&mut self, _buf: &mut [u8]) {}
}

/// Application-mode reply engine for one communication link.
///
/// Owns the common data accumulator, so hosts running multiple links get one
/// accumulator per link and buffered data never cross-contaminates.
#[derive(Debug)]
pub struct ReplyEngine<S, C, T> {
    accumulator: DataAccumulator,
    sink: S,
    clock: C,
    telemetry: T,
}

impl ReplyEngine<DiscardSink, SystemClock, ZeroTelemetry> {
    /// Create an engine with the stock collaborators: DATA frames are
    /// negative-acknowledged, telemetry is zero-filled, and time comes from
    /// the system clock.
    pub fn stub() -> Self {
        ReplyEngine::new(DiscardSink, SystemClock, ZeroTelemetry)
    }
}

impl<S: DataSink, C: Clock, T: TelemetrySource> ReplyEngine<S, C, T> {
    /// Create an engine with the given collaborators.
    pub fn new(sink: S, clock: C, telemetry: T) -> Self {
        ReplyEngine {
            accumulator: DataAccumulator::new(),
            sink,
            clock,
            telemetry,
        }
    }

    /// Get the data accumulator.
    pub fn accumulator(&self) -> &DataAccumulator {
        &self.accumulator
    }

    /// Generate the reply to a completed inbound frame.
    ///
    /// Returns a freshly built frame per call. An opcode byte with no
    /// assigned meaning yields [`ReplyError::UnsupportedOpcode`]; every
    /// assigned opcode produces a reply, even if only a NACK.
    pub fn generate_reply(&mut self, rx: &Frame) -> Result<Frame, ReplyError> {
        let opcode = Opcode::try_from(rx.opcode_byte())
            .map_err(|_| ReplyError::UnsupportedOpcode(rx.opcode_byte()))?;

        let mut reply = Frame::new();
        reply.set_start_bytes();
        reply.set_hw_id(rx.hw_id());
        reply.set_msg_id(rx.msg_id());
        reply.set_route(swap_route(rx.route()));

        match opcode {
            Opcode::CommonAck => ack(&mut reply),
            Opcode::CommonNack => nack(&mut reply),

            Opcode::CommonDebug => {
                // Echo the payload verbatim.
                reply.set_msg_len(rx.msg_len());
                reply.set_opcode_byte(Opcode::CommonDebug.code());
                reply.payload_mut().copy_from_slice(rx.payload());
            }

            Opcode::CommonData => {
                self.accumulator.load(rx.payload());
                let applied = self.sink.apply(self.accumulator.bytes());
                log::debug!(
                    "data frame: {} bytes accumulated, apply {}",
                    self.accumulator.len(),
                    if applied { "ok" } else { "failed" }
                );
                if applied {
                    ack(&mut reply);
                } else {
                    nack(&mut reply);
                }
            }

            // The extended flash path is not serviced in application mode.
            Opcode::CommonWriteExt | Opcode::CommonEraseSectorExt | Opcode::CommonReadExt => {
                nack(&mut reply);
            }

            // Bootloader opcodes are never serviced by the application.
            Opcode::BootloaderAck
            | Opcode::BootloaderNack
            | Opcode::BootloaderPing
            | Opcode::BootloaderErase
            | Opcode::BootloaderWritePage
            | Opcode::BootloaderWritePageAddr32
            | Opcode::BootloaderJump => {
                nack(&mut reply);
            }

            Opcode::BootloaderPower => {
                // The one NACK that carries a reason payload.
                reply.set_msg_len(MIN_MSG_LEN + 1);
                reply.set_opcode_byte(Opcode::CommonNack.code());
                reply.payload_mut()[0] = POWER_NACK_REASON;
            }

            Opcode::AppGetTelem => {
                reply.set_msg_len(TELEM_MSG_LEN);
                reply.set_opcode_byte(Opcode::AppTelem.code());
                self.telemetry.sample(reply.payload_mut());
            }

            Opcode::AppGetTime => {
                let (secs, nanos) = epoch_elapsed(self.clock.now());
                reply.set_msg_len(TIME_MSG_LEN);
                reply.set_opcode_byte(Opcode::AppSetTime.code());
                let payload = reply.payload_mut();
                payload[0..4].copy_from_slice(&secs.to_le_bytes());
                payload[4..8].copy_from_slice(&nanos.to_le_bytes());
            }

            // Not serviceable inbound on an application node.
            Opcode::AppReboot | Opcode::AppSetTime | Opcode::AppTelem => {
                nack(&mut reply);
            }
        }

        log::debug!("reply: {}", reply);
        Ok(reply)
    }
}

fn ack(reply: &mut Frame) {
    reply.set_msg_len(MIN_MSG_LEN);
    reply.set_opcode_byte(Opcode::CommonAck.code());
}

fn nack(reply: &mut Frame) {
    reply.set_msg_len(MIN_MSG_LEN);
    reply.set_opcode_byte(Opcode::CommonNack.code());
}
