//! Messages understood by every panel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{IpcCommand, IpcNotification};

/// Pushes the persisted configuration to the panel.
#[derive(Debug)]
pub enum DidChangeConfiguration {}

impl IpcNotification for DidChangeConfiguration {
	const METHOD: &'static str = "configuration/didChange";
	type Params = DidChangeConfigurationParams;
}

/// Params of [`DidChangeConfiguration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DidChangeConfigurationParams {
	/// Raw merged settings, without runtime mode overlays.
	pub config: Value,
}

/// Asks the host to write settings on the panel's behalf.
#[derive(Debug)]
pub enum UpdateConfiguration {}

impl IpcCommand for UpdateConfiguration {
	const METHOD: &'static str = "configuration/update";
	type Params = UpdateConfigurationParams;
}

/// Params of [`UpdateConfiguration`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateConfigurationParams {
	/// `"workspace"` targets workspace settings; anything else targets user settings.
	#[serde(default)]
	pub scope: Option<String>,
	/// Setting key to new value.
	#[serde(default)]
	pub changes: BTreeMap<String, Value>,
	/// Setting keys to clear.
	#[serde(default)]
	pub removes: Vec<String>,
}

impl UpdateConfigurationParams {
	/// Returns true when the writes target workspace settings.
	pub fn is_workspace_scope(&self) -> bool {
		self.scope.as_deref() == Some("workspace")
	}
}
