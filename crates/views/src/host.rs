//! Interfaces presented by the hosting application.
//!
//! The host owns the real window system, settings storage, command palette
//! and version-control data. Everything in this crate reaches them only
//! through these traits.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use vellum_ipc::IpcMessage;

use crate::Result;
use crate::results::FileChange;
use crate::subscription::Subscription;

/// Editor column a panel is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewColumn {
	/// Whichever column is currently active.
	#[default]
	Active,
	/// The column to the right of the active one.
	Beside,
	/// A numbered column, starting at 1.
	Number(u8),
}

/// Visibility of a panel as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
	/// Panel has focus.
	pub active: bool,
	/// Panel is on screen.
	pub visible: bool,
}

/// Parameters for creating a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelOptions {
	/// Host-side identity of the panel type.
	pub id: String,
	/// Tab title.
	pub title: String,
	/// Placement.
	pub column: ViewColumn,
	/// Keep the embedded surface alive while hidden.
	pub retain_context_when_hidden: bool,
	/// Allow scripts in the embedded surface.
	pub enable_scripts: bool,
}

/// Callback for panel disposal.
pub type DisposeListener = Box<dyn Fn() + Send + Sync>;
/// Callback for view state changes.
pub type ViewStateListener = Box<dyn Fn(ViewState) + Send + Sync>;
/// Callback for inbound panel messages.
pub type MessageListener = Box<dyn Fn(IpcMessage) + Send + Sync>;
/// Callback for configuration changes.
pub type ConfigListener = Box<dyn Fn() + Send + Sync>;
/// Handler bound to a command id.
pub type CommandHandler = Arc<dyn Fn() + Send + Sync>;

/// Creates panels.
pub trait PanelHost: Send + Sync {
	/// Creates and shows a new panel.
	fn create_panel(&self, options: PanelOptions) -> Arc<dyn PanelHandle>;
}

/// A live panel owned by the host.
#[async_trait]
pub trait PanelHandle: Send + Sync {
	/// Replaces the document shown in the embedded surface.
	fn set_content(&self, html: &str);

	/// Brings the panel to front.
	fn reveal(&self, column: ViewColumn, preserve_focus: bool);

	/// Updates the tab title.
	fn set_title(&self, title: &str);

	/// Current view state.
	fn view_state(&self) -> ViewState;

	/// Closes the panel. Fires the dispose listeners.
	fn dispose(&self);

	/// Posts a message to the embedded surface. Resolves `false` if the
	/// surface is gone.
	async fn post_message(&self, message: IpcMessage) -> bool;

	/// Registers a callback for panel disposal.
	fn on_did_dispose(&self, listener: DisposeListener) -> Subscription;

	/// Registers a callback for view state changes.
	fn on_did_change_view_state(&self, listener: ViewStateListener) -> Subscription;

	/// Registers a callback for messages posted by the embedded surface.
	fn on_did_receive_message(&self, listener: MessageListener) -> Subscription;
}

/// Settings level a write applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigTarget {
	/// User-wide settings.
	Global,
	/// Settings of the open workspace.
	Workspace,
}

/// The host's settings store.
#[async_trait]
pub trait ConfigStore: Send + Sync {
	/// Effective value of `key`.
	fn get(&self, key: &str) -> Option<Value>;

	/// Contributed default of `key`.
	fn inspect_default(&self, key: &str) -> Option<Value>;

	/// Merged persisted settings as one object, without in-process mode overlays.
	fn raw_snapshot(&self) -> Value;

	/// Writes `key` at `target`. `None` clears the override.
	async fn update(&self, key: &str, value: Option<Value>, target: ConfigTarget) -> Result<()>;

	/// Registers a callback fired on any settings change.
	fn on_did_change(&self, listener: ConfigListener) -> Subscription;
}

/// The host's command registry.
pub trait CommandRegistry: Send + Sync {
	/// Binds `handler` to `command`.
	fn register(&self, command: &str, handler: CommandHandler) -> Subscription;
}

/// Version-control data source for result trees.
#[async_trait]
pub trait DiffProvider: Send + Sync {
	/// Files changed between `ref1` and `ref2` (the working tree when `None`).
	///
	/// `Ok(None)` means the provider had nothing to report.
	async fn diff_status(&self, repo_path: &Path, ref1: &str, ref2: Option<&str>) -> Result<Option<Vec<FileChange>>>;
}

/// Redraw signal of a tree view.
pub trait TreeRefresher: Send + Sync {
	/// Asks the host to re-query the item and children of `node_id`.
	fn node_changed(&self, node_id: &str);
}
