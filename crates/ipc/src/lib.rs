//! Message envelope and sequencing for the host/panel IPC channel.
//!
//! This crate is transport-agnostic: it defines what travels over the channel,
//! not how it is posted.
//! * [`IpcMessage`]: The `{id, method, params}` wire envelope
//! * [`IpcSequence`]: Monotonic, process-wide envelope id generator
//! * [`IpcNotification`] / [`IpcCommand`]: Typed outbound and inbound messages
//! * [`protocol`]: The message types every panel understands

#![warn(missing_docs)]

pub mod error;
pub mod message;
pub mod protocol;
pub mod sequence;

pub use error::{Error, Result};
pub use message::{IpcCommand, IpcMessage, IpcNotification};
pub use sequence::{IpcId, IpcSequence, MAX_SAFE_INTEGER};
