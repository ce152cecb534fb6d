//! Embedded panel lifecycle and messaging.
//!
//! A [`PanelController`] owns at most one host panel for a [`PanelView`]. It
//! renders the view's template into a document, recreates or reloads the
//! panel on [`show`](PanelController::show), pushes typed notifications and
//! dispatches the messages the panel posts back.

mod config_update;
mod controller;
mod document;

use std::sync::Arc;

use async_trait::async_trait;
use vellum_ipc::IpcMessage;

pub use self::config_update::apply_configuration_update;
pub use self::controller::{PanelController, PanelServices};
pub use self::document::{TEMPLATE_DIR, render_template};
use crate::Result;
use crate::host::PanelHandle;
use crate::subscription::Subscription;

/// Produces one document fragment.
#[async_trait]
pub trait RenderHook: Send + Sync {
	/// Renders the fragment's HTML.
	async fn render(&self) -> Result<String>;
}

/// A concrete panel: identity plus optional rendering and messaging capabilities.
///
/// Only [`id`](Self::id), [`title`](Self::title) and
/// [`filename`](Self::filename) are required. Each fragment hook is looked
/// up when the document is rendered; a view without one leaves the
/// placeholder untouched.
#[async_trait]
pub trait PanelView: Send + Sync + 'static {
	/// Host-side identity of the panel type.
	fn id(&self) -> &str;

	/// Tab title.
	fn title(&self) -> &str;

	/// Template file name under [`TEMPLATE_DIR`].
	fn filename(&self) -> &str;

	/// Command that opens the panel, registered for the controller's lifetime.
	fn show_command(&self) -> Option<&str> {
		None
	}

	/// Fills `{{head}}`.
	fn head(&self) -> Option<&dyn RenderHook> {
		None
	}

	/// Fills `{{body}}`.
	fn body(&self) -> Option<&dyn RenderHook> {
		None
	}

	/// Fills `{{endOfBody}}`.
	fn end_of_body(&self) -> Option<&dyn RenderHook> {
		None
	}

	/// Extra listeners on a freshly created panel, released with it.
	fn panel_listeners(&self, panel: &Arc<dyn PanelHandle>) -> Vec<Subscription> {
		let _ = panel;
		Vec::new()
	}

	/// Handles messages the controller does not recognize. Ignores them by default.
	async fn on_message(&self, controller: &PanelController, message: &IpcMessage) {
		let _ = (controller, message);
	}
}
