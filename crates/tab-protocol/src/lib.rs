//! TAB Command/Telemetry Link Protocol
//!
//! This crate provides the wire-level types and utilities for the TAB
//! protocol used between small-satellite bus nodes (ground, communications,
//! command/data handling, payload). Every message is a fixed-header,
//! variable-payload frame:
//!
//! - **Frames** carry two start markers, a length field, little-endian
//!   hardware and message ids, a packed source/destination route byte, an
//!   opcode, and up to 249 payload bytes.
//! - **Receiving** is done byte-at-a-time by [`RxParser`], which
//!   resynchronizes on the marker pair anywhere in the stream.
//! - **Sending** uses [`TxCommand`], which builds well-formed frames for any
//!   opcode from typed parameters.
//! - **Diagnostics** come from [`describe`], a total frame-to-text decoder.
//!
//! # Example
//!
//! ```rust
//! use tab_protocol::{describe, Node, Opcode, RxParser, TxCommand};
//!
//! // Build a command
//! let mut cmd = TxCommand::new(Opcode::CommonDebug, 0x0012, 0x0001, Node::Gnd, Node::Cdh);
//! cmd.debug("hello").unwrap();
//!
//! // Parse it back from the byte stream
//! let mut parser = RxParser::new();
//! assert!(parser.feed_slice(cmd.as_bytes()));
//! println!("{}", describe(parser.frame().unwrap().as_bytes()));
//! ```

mod command;
mod constants;
mod decode;
mod error;
mod frame;
mod parser;
mod types;

pub use command::*;
pub use constants::*;
pub use decode::*;
pub use error::*;
pub use frame::*;
pub use parser::*;
pub use types::*;
