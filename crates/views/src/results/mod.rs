//! Lazily populated result trees.
//!
//! A [`ResultsFilesNode`] answers the host's tree queries for one diff. Its
//! children are [`TreeNode`]s: synthetic [`FolderNode`]s built per query and
//! [`FileNode`] leaves.

mod entries;
mod files;

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

pub use self::entries::{FileNode, FolderNode, TreeNode};
pub use self::files::{FALLBACK_LABEL, ResultsFilesNode, TREE_ITEM_TIMEOUT};
use crate::config::ViewConfig;
use crate::host::TreeRefresher;

/// How a file differs between the compared refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
	/// Added.
	Added,
	/// Modified.
	Modified,
	/// Deleted.
	Deleted,
	/// Renamed from `original_path`.
	Renamed,
	/// Copied from `original_path`.
	Copied,
}

/// One changed file reported by a [`DiffProvider`](crate::host::DiffProvider).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
	/// Repository-relative path, `/`-separated.
	pub path: String,
	/// Change kind.
	pub status: FileStatus,
	/// Previous path of renames and copies.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub original_path: Option<String>,
}

impl FileChange {
	/// Creates a change without an original path.
	pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
		Self {
			path: path.into(),
			status,
			original_path: None,
		}
	}
}

/// Outcome of a results query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
	/// Summary shown on the results node.
	pub label: String,
	/// Changed files; `None` when the provider had nothing to report.
	pub diff: Option<Vec<FileChange>>,
}

impl QueryResult {
	/// Labels `diff` with its file count.
	pub fn from_diff(diff: Option<Vec<FileChange>>) -> Self {
		let label = match diff.as_ref().map(Vec::len) {
			None => FALLBACK_LABEL.to_owned(),
			Some(0) => "No files changed".to_owned(),
			Some(1) => "1 file changed".to_owned(),
			Some(n) => format!("{n} files changed"),
		};
		Self { label, diff }
	}
}

/// Expansion affordance of a tree item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollapsibleState {
	/// Leaf; no expansion arrow.
	None,
	/// Has children, shown collapsed.
	Collapsed,
	/// Has children, shown expanded.
	Expanded,
}

/// Display state handed to the host for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
	/// Stable node identity.
	pub id: String,
	/// Primary text.
	pub label: String,
	/// Secondary text.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Expansion affordance.
	pub collapsible_state: CollapsibleState,
	/// Key for context menus and when-clauses.
	pub context_value: &'static str,
}

/// State shared by all nodes of one tree view.
pub struct ViewContext {
	config: ArcSwap<ViewConfig>,
	refresher: Arc<dyn TreeRefresher>,
}

impl std::fmt::Debug for ViewContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewContext").field("config", &self.config.load_full()).finish_non_exhaustive()
	}
}

impl ViewContext {
	/// Creates a context with `config` and the view's redraw signal.
	pub fn new(config: ViewConfig, refresher: Arc<dyn TreeRefresher>) -> Self {
		Self {
			config: ArcSwap::from_pointee(config),
			refresher,
		}
	}

	/// Current settings.
	pub fn config(&self) -> Arc<ViewConfig> {
		self.config.load_full()
	}

	/// Replaces the settings; nodes read them on their next query.
	pub fn set_config(&self, config: ViewConfig) {
		self.config.store(Arc::new(config));
	}

	/// The view's redraw signal.
	pub fn refresher(&self) -> &Arc<dyn TreeRefresher> {
		&self.refresher
	}
}
