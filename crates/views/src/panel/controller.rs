use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use vellum_ipc::protocol::{DidChangeConfiguration, DidChangeConfigurationParams, UpdateConfiguration};
use vellum_ipc::{IpcMessage, IpcNotification, IpcSequence};

use super::PanelView;
use super::config_update::apply_configuration_update;
use super::document::DocumentCache;
use crate::Result;
use crate::env::Environment;
use crate::host::{CommandRegistry, ConfigStore, PanelHandle, PanelHost, PanelOptions, ViewColumn, ViewState};
use crate::spawn::spawn;
use crate::subscription::{Subscription, SubscriptionSet};

/// Host services a controller works against.
#[derive(Clone)]
pub struct PanelServices {
	/// Creates panels.
	pub host: Arc<dyn PanelHost>,
	/// Settings store read for notifications and written by panel requests.
	pub config: Arc<dyn ConfigStore>,
	/// Registry for the view's show command.
	pub commands: Arc<dyn CommandRegistry>,
	/// Extension install root and debugging flag.
	pub env: Environment,
	/// Source of outbound envelope ids.
	pub sequence: &'static IpcSequence,
}

impl PanelServices {
	/// Bundles services using the process-wide id sequence.
	pub fn new(
		host: Arc<dyn PanelHost>,
		config: Arc<dyn ConfigStore>,
		commands: Arc<dyn CommandRegistry>,
		env: Environment,
	) -> Self {
		Self {
			host,
			config,
			commands,
			env,
			sequence: IpcSequence::global(),
		}
	}

	/// Replaces the id sequence.
	pub fn with_sequence(mut self, sequence: &'static IpcSequence) -> Self {
		self.sequence = sequence;
		self
	}
}

/// A live panel and the listeners registered on it.
struct OpenPanel {
	handle: Arc<dyn PanelHandle>,
	subscriptions: SubscriptionSet,
}

/// Owns the panel of one [`PanelView`].
///
/// Created with [`PanelController::new`]; lives until [`dispose`](Self::dispose)
/// or the last `Arc` is dropped. The panel itself can be closed and reopened
/// any number of times in between.
pub struct PanelController {
	this: Weak<Self>,
	view: Arc<dyn PanelView>,
	services: PanelServices,
	document: DocumentCache,
	panel: Mutex<Option<OpenPanel>>,
	subscriptions: Mutex<SubscriptionSet>,
	disposed: AtomicBool,
}

impl std::fmt::Debug for PanelController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PanelController")
			.field("view", &self.view.id())
			.field("open", &self.is_open())
			.field("disposed", &self.disposed.load(Ordering::Acquire))
			.finish_non_exhaustive()
	}
}

impl PanelController {
	/// Creates the controller and registers its configuration listener and the
	/// view's show command.
	pub fn new(view: Arc<dyn PanelView>, services: PanelServices) -> Arc<Self> {
		let controller = Arc::new_cyclic(|this| Self {
			this: this.clone(),
			view,
			services,
			document: DocumentCache::default(),
			panel: Mutex::new(None),
			subscriptions: Mutex::new(SubscriptionSet::new()),
			disposed: AtomicBool::new(false),
		});
		controller.register();
		controller
	}

	fn register(&self) {
		let this = self.this.clone();
		self.track(self.services.config.on_did_change(Box::new(move || {
			if let Some(controller) = this.upgrade() {
				controller.push_configuration();
			}
		})));

		if let Some(command) = self.view.show_command() {
			let this = self.this.clone();
			self.track(self.services.commands.register(
				command,
				Arc::new(move || {
					let Some(controller) = this.upgrade() else { return };
					let _ = spawn("panel.show_command", async move {
						if let Err(err) = controller.show(ViewColumn::Active).await {
							tracing::warn!(view = controller.view.id(), error = %err, "panel.show_failed");
						}
					});
				}),
			));
		}
	}

	/// Adds a registration released when the controller is disposed.
	///
	/// Released immediately if the controller is already disposed.
	pub fn track(&self, subscription: Subscription) {
		if self.disposed.load(Ordering::Acquire) {
			subscription.dispose();
			return;
		}
		self.subscriptions.lock().push(subscription);
	}

	/// The view this controller presents.
	pub fn view(&self) -> &Arc<dyn PanelView> {
		&self.view
	}

	/// Returns true while a panel exists.
	pub fn is_open(&self) -> bool {
		self.panel.lock().is_some()
	}

	/// Returns true if the panel exists and is on screen.
	pub fn visible(&self) -> bool {
		self.view_state().is_some_and(|state| state.visible)
	}

	/// Returns true if the panel exists and has focus.
	pub fn active(&self) -> bool {
		self.view_state().is_some_and(|state| state.active)
	}

	fn view_state(&self) -> Option<ViewState> {
		self.handle().map(|handle| handle.view_state())
	}

	fn handle(&self) -> Option<Arc<dyn PanelHandle>> {
		self.panel.lock().as_ref().map(|open| Arc::clone(&open.handle))
	}

	/// Opens the panel in `column`, or reloads and reveals it if already open.
	///
	/// The document is rendered before any panel state changes. Overlapping
	/// calls each render and the last one to finish decides the content.
	pub async fn show(&self, column: ViewColumn) -> Result<()> {
		let html = self.document.render(self.view.as_ref(), &self.services.env).await?;
		if self.disposed.load(Ordering::Acquire) {
			tracing::debug!(view = self.view.id(), "panel.show_after_dispose");
			return Ok(());
		}

		if let Some(handle) = self.handle() {
			tracing::debug!(view = self.view.id(), ?column, "panel.reload");
			// Identical content would be a no-op for the host; clear first to force a reload.
			handle.set_content("");
			handle.set_content(&html);
			handle.reveal(column, true);
			return Ok(());
		}

		tracing::debug!(view = self.view.id(), ?column, "panel.create");
		let handle = self.services.host.create_panel(PanelOptions {
			id: self.view.id().to_owned(),
			title: self.view.title().to_owned(),
			column,
			retain_context_when_hidden: true,
			enable_scripts: true,
		});
		let subscriptions = self.panel_listeners(&handle);
		*self.panel.lock() = Some(OpenPanel {
			handle: Arc::clone(&handle),
			subscriptions,
		});
		handle.set_content(&html);
		Ok(())
	}

	fn panel_listeners(&self, handle: &Arc<dyn PanelHandle>) -> SubscriptionSet {
		let mut subscriptions = SubscriptionSet::new();

		let this = self.this.clone();
		subscriptions.push(handle.on_did_dispose(Box::new(move || {
			if let Some(controller) = this.upgrade() {
				controller.on_panel_disposed();
			}
		})));

		let this = self.this.clone();
		subscriptions.push(handle.on_did_change_view_state(Box::new(move |state| {
			if state.active
				&& let Some(controller) = this.upgrade()
			{
				controller.push_configuration();
			}
		})));

		let this = self.this.clone();
		subscriptions.push(handle.on_did_receive_message(Box::new(move |message| {
			let Some(controller) = this.upgrade() else { return };
			let _ = spawn("panel.dispatch", async move { controller.dispatch(message).await });
		})));

		subscriptions.extend(self.view.panel_listeners(handle));
		subscriptions
	}

	fn on_panel_disposed(&self) {
		let open = self.panel.lock().take();
		if let Some(mut open) = open {
			tracing::debug!(view = self.view.id(), "panel.disposed");
			open.subscriptions.dispose();
		}
	}

	/// Closes the panel if one exists.
	pub fn hide(&self) {
		let open = self.panel.lock().take();
		if let Some(open) = open {
			tracing::debug!(view = self.view.id(), "panel.hide");
			Self::release_panel(open);
		}
	}

	/// Updates the title of the open panel.
	pub fn set_title(&self, title: &str) {
		if let Some(handle) = self.handle() {
			handle.set_title(title);
		}
	}

	/// Drops the cached document and reloads the open panel from a fresh render.
	pub async fn reload(&self) -> Result<()> {
		self.document.clear();
		if !self.is_open() {
			return Ok(());
		}
		let html = self.document.render(self.view.as_ref(), &self.services.env).await?;
		if let Some(handle) = self.handle() {
			handle.set_content("");
			handle.set_content(&html);
		}
		Ok(())
	}

	/// Posts notification `N` to the panel.
	///
	/// Resolves `false` when no panel exists or the host could not deliver it.
	pub async fn notify<N: IpcNotification>(&self, params: &N::Params) -> bool {
		let Some(handle) = self.handle() else {
			return false;
		};
		let message = match IpcMessage::notification::<N>(self.services.sequence.next(), params) {
			Ok(message) => message,
			Err(err) => {
				tracing::warn!(view = self.view.id(), error = %err, "panel.notify_failed");
				return false;
			}
		};
		tracing::trace!(view = self.view.id(), id = %message.id, method = N::METHOD, "panel.notify");
		handle.post_message(message).await
	}

	/// Pushes the raw persisted configuration to the panel.
	pub async fn notify_did_change_configuration(&self) -> bool {
		let params = DidChangeConfigurationParams {
			config: self.services.config.raw_snapshot(),
		};
		self.notify::<DidChangeConfiguration>(&params).await
	}

	fn push_configuration(&self) {
		if !self.is_open() {
			return;
		}
		let Some(controller) = self.this.upgrade() else { return };
		let _ = spawn("panel.push_configuration", async move {
			controller.notify_did_change_configuration().await;
		});
	}

	/// Handles one message posted by the panel.
	///
	/// Configuration updates are applied to the store; other methods go to
	/// the view's [`on_message`](PanelView::on_message).
	pub async fn dispatch(&self, message: IpcMessage) {
		tracing::debug!(view = self.view.id(), id = %message.id, method = %message.method, "panel.message");
		match message.params_for::<UpdateConfiguration>() {
			Some(Ok(params)) => {
				if let Err(err) = apply_configuration_update(self.services.config.as_ref(), params).await {
					tracing::warn!(view = self.view.id(), error = %err, "panel.configuration_update_failed");
				}
			}
			Some(Err(err)) => {
				tracing::warn!(view = self.view.id(), error = %err, "panel.message_invalid");
			}
			None => self.view.on_message(self, &message).await,
		}
	}

	/// Releases the controller's registrations and closes its panel.
	///
	/// Safe to call repeatedly; every step runs even if an earlier one panics.
	pub fn dispose(&self) {
		if self.disposed.swap(true, Ordering::AcqRel) {
			return;
		}
		tracing::debug!(view = self.view.id(), "panel.controller.dispose");

		let mut subscriptions = std::mem::take(&mut *self.subscriptions.lock());
		subscriptions.dispose();

		let open = self.panel.lock().take();
		if let Some(open) = open {
			Self::release_panel(open);
		}
	}

	fn release_panel(mut open: OpenPanel) {
		open.subscriptions.dispose();
		let handle = open.handle;
		if catch_unwind(AssertUnwindSafe(|| handle.dispose())).is_err() {
			tracing::warn!("panel.dispose_panicked");
		}
	}
}

impl Drop for PanelController {
	fn drop(&mut self) {
		self.dispose();
	}
}
