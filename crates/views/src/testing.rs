//! In-memory host doubles for tests.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use vellum_ipc::IpcMessage;

use crate::{Error, Result};
use crate::host::{
	CommandHandler, CommandRegistry, ConfigListener, ConfigStore, ConfigTarget, DiffProvider, DisposeListener,
	MessageListener, PanelHandle, PanelHost, PanelOptions, TreeRefresher, ViewColumn, ViewState, ViewStateListener,
};
use crate::results::FileChange;
use crate::subscription::Subscription;

/// Listener list whose entries unregister through a [`Subscription`].
pub(crate) struct Listeners<F: ?Sized> {
	next: AtomicU64,
	entries: Arc<Mutex<Vec<(u64, Arc<F>)>>>,
}

impl<F: ?Sized + Send + Sync + 'static> Listeners<F> {
	pub(crate) fn new() -> Self {
		Self {
			next: AtomicU64::new(0),
			entries: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub(crate) fn add(&self, listener: Arc<F>) -> Subscription {
		let key = self.next.fetch_add(1, Ordering::Relaxed);
		self.entries.lock().push((key, listener));
		let entries = Arc::clone(&self.entries);
		Subscription::new(move || entries.lock().retain(|(k, _)| *k != key))
	}

	pub(crate) fn snapshot(&self) -> Vec<Arc<F>> {
		self.entries.lock().iter().map(|(_, l)| Arc::clone(l)).collect()
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.lock().len()
	}
}

/// Settings store with flat dotted keys and three levels.
pub(crate) struct MemoryConfigStore {
	defaults: BTreeMap<String, Value>,
	user: Mutex<BTreeMap<String, Value>>,
	workspace: Mutex<BTreeMap<String, Value>>,
	pub(crate) writes: Mutex<Vec<(String, Option<Value>, ConfigTarget)>>,
	/// Keys whose writes fail.
	pub(crate) read_only: Mutex<Vec<String>>,
	listeners: Listeners<dyn Fn() + Send + Sync>,
}

impl MemoryConfigStore {
	/// `defaults` is a flat object of dotted keys.
	pub(crate) fn new(defaults: Value) -> Self {
		let defaults = match defaults {
			Value::Object(map) => map.into_iter().collect(),
			_ => BTreeMap::new(),
		};
		Self {
			defaults,
			user: Mutex::new(BTreeMap::new()),
			workspace: Mutex::new(BTreeMap::new()),
			writes: Mutex::new(Vec::new()),
			read_only: Mutex::new(Vec::new()),
			listeners: Listeners::new(),
		}
	}

	pub(crate) fn set_user(&self, key: &str, value: Value) {
		self.user.lock().insert(key.to_owned(), value);
		self.fire();
	}

	pub(crate) fn user_value(&self, key: &str) -> Option<Value> {
		self.user.lock().get(key).cloned()
	}

	pub(crate) fn workspace_value(&self, key: &str) -> Option<Value> {
		self.workspace.lock().get(key).cloned()
	}

	pub(crate) fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	fn fire(&self) {
		for listener in self.listeners.snapshot() {
			listener();
		}
	}
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
	fn get(&self, key: &str) -> Option<Value> {
		self.workspace_value(key)
			.or_else(|| self.user_value(key))
			.or_else(|| self.defaults.get(key).cloned())
	}

	fn inspect_default(&self, key: &str) -> Option<Value> {
		self.defaults.get(key).cloned()
	}

	fn raw_snapshot(&self) -> Value {
		let mut keys: Vec<String> = self.defaults.keys().cloned().collect();
		keys.extend(self.user.lock().keys().cloned());
		keys.extend(self.workspace.lock().keys().cloned());
		keys.sort();
		keys.dedup();

		let mut root = Map::new();
		for key in keys {
			let Some(value) = self.get(&key) else { continue };
			let mut parts: Vec<&str> = key.split('.').collect();
			let Some(last) = parts.pop() else { continue };
			let mut node = &mut root;
			for part in parts {
				let entry = node.entry(part.to_owned()).or_insert_with(|| Value::Object(Map::new()));
				if !entry.is_object() {
					*entry = Value::Object(Map::new());
				}
				let Value::Object(map) = entry else { unreachable!() };
				node = map;
			}
			node.insert(last.to_owned(), value);
		}
		Value::Object(root)
	}

	async fn update(&self, key: &str, value: Option<Value>, target: ConfigTarget) -> Result<()> {
		self.writes.lock().push((key.to_owned(), value.clone(), target));
		if self.read_only.lock().iter().any(|k| k == key) {
			return Err(Error::ConfigUpdate {
				key: key.to_owned(),
				message: "setting is read-only".to_owned(),
			});
		}
		{
			let mut level = match target {
				ConfigTarget::Global => self.user.lock(),
				ConfigTarget::Workspace => self.workspace.lock(),
			};
			match value {
				Some(value) => level.insert(key.to_owned(), value),
				None => level.remove(key),
			};
		}
		self.fire();
		Ok(())
	}

	fn on_did_change(&self, listener: ConfigListener) -> Subscription {
		self.listeners.add(Arc::from(listener))
	}
}

/// Command registry that keeps handlers so tests can invoke them.
#[derive(Default)]
pub(crate) struct RecordingCommands {
	handlers: Arc<Mutex<BTreeMap<String, CommandHandler>>>,
}

impl RecordingCommands {
	pub(crate) fn invoke(&self, command: &str) -> bool {
		let handler = self.handlers.lock().get(command).cloned();
		handler.map(|h| h()).is_some()
	}

	pub(crate) fn registered(&self) -> Vec<String> {
		self.handlers.lock().keys().cloned().collect()
	}
}

impl CommandRegistry for RecordingCommands {
	fn register(&self, command: &str, handler: CommandHandler) -> Subscription {
		self.handlers.lock().insert(command.to_owned(), handler);
		let (handlers, command) = (Arc::clone(&self.handlers), command.to_owned());
		Subscription::new(move || {
			handlers.lock().remove(&command);
		})
	}
}

/// Tree redraw signal that records node ids.
#[derive(Default)]
pub(crate) struct RecordingRefresher {
	pub(crate) changed: Mutex<Vec<String>>,
}

impl TreeRefresher for RecordingRefresher {
	fn node_changed(&self, node_id: &str) {
		self.changed.lock().push(node_id.to_owned());
	}
}

/// Diff provider answering with a fixed result after a delay.
pub(crate) struct StaticDiffProvider {
	pub(crate) delay: Duration,
	pub(crate) diff: Mutex<Option<Vec<FileChange>>>,
	pub(crate) fail: AtomicBool,
	pub(crate) calls: AtomicUsize,
}

impl StaticDiffProvider {
	pub(crate) fn new(diff: Option<Vec<FileChange>>, delay: Duration) -> Self {
		Self {
			delay,
			diff: Mutex::new(diff),
			fail: AtomicBool::new(false),
			calls: AtomicUsize::new(0),
		}
	}

	pub(crate) fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl DiffProvider for StaticDiffProvider {
	async fn diff_status(&self, _repo_path: &Path, _ref1: &str, _ref2: Option<&str>) -> Result<Option<Vec<FileChange>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		tokio::time::sleep(self.delay).await;
		if self.fail.load(Ordering::SeqCst) {
			return Err(Error::provider(std::io::Error::other("repository is locked")));
		}
		Ok(self.diff.lock().clone())
	}
}

/// Panel double recording every call.
pub(crate) struct FakePanel {
	pub(crate) options: PanelOptions,
	pub(crate) contents: Mutex<Vec<String>>,
	pub(crate) reveals: Mutex<Vec<(ViewColumn, bool)>>,
	pub(crate) titles: Mutex<Vec<String>>,
	pub(crate) posted: Mutex<Vec<IpcMessage>>,
	pub(crate) state: Mutex<ViewState>,
	pub(crate) disposed: AtomicBool,
	dispose_listeners: Listeners<dyn Fn() + Send + Sync>,
	state_listeners: Listeners<dyn Fn(ViewState) + Send + Sync>,
	message_listeners: Listeners<dyn Fn(IpcMessage) + Send + Sync>,
}

impl FakePanel {
	fn new(options: PanelOptions) -> Self {
		Self {
			options,
			contents: Mutex::new(Vec::new()),
			reveals: Mutex::new(Vec::new()),
			titles: Mutex::new(Vec::new()),
			posted: Mutex::new(Vec::new()),
			state: Mutex::new(ViewState {
				active: true,
				visible: true,
			}),
			disposed: AtomicBool::new(false),
			dispose_listeners: Listeners::new(),
			state_listeners: Listeners::new(),
			message_listeners: Listeners::new(),
		}
	}

	/// Simulates the user focusing or blurring the panel.
	pub(crate) fn change_view_state(&self, state: ViewState) {
		*self.state.lock() = state;
		for listener in self.state_listeners.snapshot() {
			listener(state);
		}
	}

	/// Simulates the panel script posting a message.
	pub(crate) fn receive(&self, message: IpcMessage) {
		for listener in self.message_listeners.snapshot() {
			listener(message.clone());
		}
	}

	pub(crate) fn listener_count(&self) -> usize {
		self.dispose_listeners.len() + self.state_listeners.len() + self.message_listeners.len()
	}

	pub(crate) fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl PanelHandle for FakePanel {
	fn set_content(&self, html: &str) {
		self.contents.lock().push(html.to_owned());
	}

	fn reveal(&self, column: ViewColumn, preserve_focus: bool) {
		self.reveals.lock().push((column, preserve_focus));
	}

	fn set_title(&self, title: &str) {
		self.titles.lock().push(title.to_owned());
	}

	fn view_state(&self) -> ViewState {
		*self.state.lock()
	}

	fn dispose(&self) {
		if self.disposed.swap(true, Ordering::SeqCst) {
			return;
		}
		for listener in self.dispose_listeners.snapshot() {
			listener();
		}
	}

	async fn post_message(&self, message: IpcMessage) -> bool {
		if self.is_disposed() {
			return false;
		}
		self.posted.lock().push(message);
		true
	}

	fn on_did_dispose(&self, listener: DisposeListener) -> Subscription {
		self.dispose_listeners.add(Arc::from(listener))
	}

	fn on_did_change_view_state(&self, listener: ViewStateListener) -> Subscription {
		self.state_listeners.add(Arc::from(listener))
	}

	fn on_did_receive_message(&self, listener: MessageListener) -> Subscription {
		self.message_listeners.add(Arc::from(listener))
	}
}

/// Panel host handing out [`FakePanel`]s.
#[derive(Default)]
pub(crate) struct FakePanelHost {
	pub(crate) created: Mutex<Vec<Arc<FakePanel>>>,
}

impl FakePanelHost {
	pub(crate) fn last(&self) -> Option<Arc<FakePanel>> {
		self.created.lock().last().cloned()
	}

	pub(crate) fn created_count(&self) -> usize {
		self.created.lock().len()
	}
}

impl PanelHost for FakePanelHost {
	fn create_panel(&self, options: PanelOptions) -> Arc<dyn PanelHandle> {
		let panel = Arc::new(FakePanel::new(options));
		self.created.lock().push(Arc::clone(&panel));
		panel
	}
}
