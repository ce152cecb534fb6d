//! Wire envelope and typed message traits.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sequence::IpcId;
use crate::{Error, Result};

/// An outbound notification type, identified by its method name.
pub trait IpcNotification {
	/// Method name carried on the wire.
	const METHOD: &'static str;
	/// Params payload.
	type Params: Serialize;
}

/// An inbound command type, identified by its method name.
pub trait IpcCommand {
	/// Method name carried on the wire.
	const METHOD: &'static str;
	/// Params payload.
	type Params: DeserializeOwned;
}

/// The envelope exchanged in both directions.
///
/// Outbound ids are `host:<n>`; inbound ids are whatever the panel script
/// chose and are only used for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
	/// Envelope id.
	pub id: String,
	/// Method used for dispatch.
	pub method: String,
	/// Method-specific payload.
	#[serde(default)]
	pub params: Value,
}

impl IpcMessage {
	/// Builds the envelope for a typed notification.
	pub fn notification<N: IpcNotification>(id: IpcId, params: &N::Params) -> Result<Self> {
		let params = serde_json::to_value(params).map_err(|err| Error::Encode {
			method: N::METHOD.into(),
			message: err.to_string(),
		})?;
		Ok(Self {
			id: id.into(),
			method: N::METHOD.into(),
			params,
		})
	}

	/// Returns true if this envelope carries method `C`.
	pub fn is<C: IpcCommand>(&self) -> bool {
		self.method == C::METHOD
	}

	/// Parses the params as command `C`.
	///
	/// Returns `None` when the method does not match, so callers can try
	/// several command types in turn.
	pub fn params_for<C: IpcCommand>(&self) -> Option<Result<C::Params>> {
		if !self.is::<C>() {
			return None;
		}
		Some(C::Params::deserialize(&self.params).map_err(|err| Error::InvalidParams {
			method: self.method.clone(),
			message: err.to_string(),
		}))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	struct Ping;

	impl IpcNotification for Ping {
		const METHOD: &'static str = "test/ping";
		type Params = Vec<u32>;
	}

	impl IpcCommand for Ping {
		const METHOD: &'static str = "test/ping";
		type Params = Vec<u32>;
	}

	#[test]
	fn notification_serializes_to_wire_shape() {
		let msg = IpcMessage::notification::<Ping>(IpcId(7), &vec![1, 2]).unwrap();
		assert_eq!(
			serde_json::to_value(&msg).unwrap(),
			json!({ "id": "host:7", "method": "test/ping", "params": [1, 2] })
		);
	}

	#[test]
	fn params_for_skips_other_methods() {
		let msg = IpcMessage {
			id: "webview:1".into(),
			method: "other".into(),
			params: json!({}),
		};
		assert!(msg.params_for::<Ping>().is_none());
	}

	#[test]
	fn params_for_reports_shape_mismatch() {
		let msg = IpcMessage {
			id: "webview:1".into(),
			method: "test/ping".into(),
			params: json!({ "not": "a list" }),
		};
		let err = msg.params_for::<Ping>().unwrap().unwrap_err();
		assert!(matches!(err, Error::InvalidParams { ref method, .. } if method == "test/ping"));
	}

	#[test]
	fn missing_params_deserialize_as_null() {
		let msg: IpcMessage = serde_json::from_value(json!({ "id": "webview:2", "method": "x" })).unwrap();
		assert_eq!(msg.params, Value::Null);
	}
}
