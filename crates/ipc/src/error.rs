//! Error types for IPC envelope handling.

use thiserror::Error;

/// Errors raised while encoding or decoding IPC params.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// Outbound params could not be serialized.
	#[error("failed to encode params for {method}: {message}")]
	Encode {
		/// Method of the message being built.
		method: String,
		/// Serializer error text.
		message: String,
	},

	/// Inbound params did not match the shape the method expects.
	#[error("invalid params for {method}: {message}")]
	InvalidParams {
		/// Method of the offending message.
		method: String,
		/// Deserializer error text.
		message: String,
	},
}

/// Result type for IPC operations.
pub type Result<T> = std::result::Result<T, Error>;
