//! TAB Application-Mode Reply Engine
//!
//! This crate turns completed inbound TAB frames into outbound reply frames.
//! It implements the application-mode opcode dispatch table on top of
//! [`tab-protocol`](tab_protocol): ACK/NACK/DEBUG handling, DATA
//! accumulation through an injected [`DataSink`], the zero-filled telemetry
//! stub, and GET_TIME replies computed against the spacecraft epoch via an
//! injected [`Clock`].
//!
//! # Example
//!
//! ```rust
//! use tab_engine::ReplyEngine;
//! use tab_protocol::{Node, Opcode, RxParser, TxCommand};
//!
//! let cmd = TxCommand::new(Opcode::CommonAck, 0x0012, 0x0001, Node::Gnd, Node::Cdh);
//!
//! let mut parser = RxParser::new();
//! assert!(parser.feed_slice(cmd.as_bytes()));
//!
//! let mut engine = ReplyEngine::stub();
//! let reply = engine.generate_reply(parser.frame().unwrap()).unwrap();
//! parser.clear();
//! assert_eq!(reply.opcode_byte(), Opcode::CommonAck.code());
//! ```

mod accumulator;
mod clock;
mod error;
mod reply;

pub use accumulator::*;
pub use clock::*;
pub use error::*;
pub use reply::*;
