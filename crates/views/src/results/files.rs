use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;
use tracing::Instrument;

use super::{CollapsibleState, FileNode, FolderNode, QueryResult, TreeItem, TreeNode, ViewContext};
use crate::Result;
use crate::cache::{CellFuture, ResultCell};
use crate::gate::Gate;
use crate::hierarchy::{dir_segments, join_path, make_hierarchical};
use crate::host::DiffProvider;
use crate::sort::sort_entries;

/// How long [`ResultsFilesNode::tree_item`] waits for the query before
/// answering with a placeholder.
pub const TREE_ITEM_TIMEOUT: Duration = Duration::from_millis(100);

/// Label used while the query is pending or when it produced no label.
pub const FALLBACK_LABEL: &str = "files changed";

/// The "files changed" node of a comparison between two refs.
///
/// The diff is fetched once, on first demand, and shared by every query until
/// [`refresh`](Self::refresh) is called with `reset`.
pub struct ResultsFilesNode {
	id: String,
	repo_path: Arc<Path>,
	ref1: String,
	ref2: Option<String>,
	view: Arc<ViewContext>,
	query: Arc<ResultCell<Arc<QueryResult>>>,
	refresh_gate: Gate<()>,
	/// Pending query that already has a redraw scheduled.
	redraw_pending: Mutex<Option<CellFuture<Arc<QueryResult>>>>,
}

impl std::fmt::Debug for ResultsFilesNode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResultsFilesNode")
			.field("id", &self.id)
			.field("repo_path", &self.repo_path)
			.field("ref1", &self.ref1)
			.field("ref2", &self.ref2)
			.finish_non_exhaustive()
	}
}

impl ResultsFilesNode {
	/// Creates the node under `parent_id`. Nothing is fetched yet.
	pub fn new(
		parent_id: &str,
		view: Arc<ViewContext>,
		provider: Arc<dyn DiffProvider>,
		repo_path: impl Into<PathBuf>,
		ref1: impl Into<String>,
		ref2: Option<String>,
	) -> Self {
		let repo_path: Arc<Path> = Arc::from(repo_path.into());
		let ref1 = ref1.into();

		let query = {
			let (repo_path, ref1, ref2) = (Arc::clone(&repo_path), ref1.clone(), ref2.clone());
			ResultCell::new(move || {
				let (provider, repo_path, ref1, ref2) = (Arc::clone(&provider), Arc::clone(&repo_path), ref1.clone(), ref2.clone());
				async move {
					let diff = provider.diff_status(&repo_path, &ref1, ref2.as_deref()).await?;
					Ok(Arc::new(QueryResult::from_diff(diff)))
				}
				.boxed()
			})
		};

		Self {
			id: format!("{parent_id}:results:files"),
			repo_path,
			ref1,
			ref2,
			view,
			query: Arc::new(query),
			refresh_gate: Gate::new(),
			redraw_pending: Mutex::new(None),
		}
	}

	/// Stable node identity.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Awaits the query and builds the child nodes.
	///
	/// Folders are synthesized per call according to the current layout
	/// settings; provider failures are returned as is.
	pub async fn children(&self) -> Result<Vec<TreeNode>> {
		let result = self.query.get().await?;
		let Some(diff) = result.diff.as_ref() else {
			return Ok(Vec::new());
		};

		let files: Vec<FileNode> = diff.iter().map(|change| FileNode::new(&self.id, change.clone())).collect();

		let config = self.view.config();
		if config.files.use_tree(files.len()) {
			let root = make_hierarchical(files, |file| dir_segments(&file.change().path), join_path, config.files.compact);
			return Ok(FolderNode::children_of(&self.id, root));
		}

		let mut nodes: Vec<TreeNode> = files.into_iter().map(TreeNode::File).collect();
		sort_entries(&mut nodes);
		Ok(nodes)
	}

	/// Display state, answered within [`TREE_ITEM_TIMEOUT`].
	///
	/// If the query is still running when the timeout elapses, the item is
	/// reported `Collapsed` with the fallback label, and the view is asked to
	/// redraw this node once the query succeeds.
	pub async fn tree_item(&self) -> Result<TreeItem> {
		let pending = self.query.get();
		let (label, collapsible_state) = match tokio::time::timeout(TREE_ITEM_TIMEOUT, pending.clone()).await {
			Ok(result) => {
				let result = result?;
				let label = if result.label.is_empty() {
					FALLBACK_LABEL.to_owned()
				} else {
					result.label.clone()
				};
				let state = match result.diff.as_deref() {
					Some(diff) if !diff.is_empty() => CollapsibleState::Expanded,
					_ => CollapsibleState::None,
				};
				(label, state)
			}
			Err(_) => {
				self.redraw_when_ready(pending);
				(FALLBACK_LABEL.to_owned(), CollapsibleState::Collapsed)
			}
		};

		Ok(TreeItem {
			id: self.id.clone(),
			label,
			description: None,
			collapsible_state,
			context_value: "vellum:results:files",
		})
	}

	fn redraw_when_ready(&self, pending: CellFuture<Arc<QueryResult>>) {
		{
			let mut scheduled = self.redraw_pending.lock();
			if scheduled.as_ref().is_some_and(|fut| fut.ptr_eq(&pending)) {
				return;
			}
			*scheduled = Some(pending.clone());
		}

		let refresher = Arc::clone(self.view.refresher());
		let id = self.id.clone();
		let _ = crate::spawn::spawn("results.redraw_when_ready", async move {
			if pending.await.is_ok() {
				tracing::trace!(node = %id, "results.redraw");
				refresher.node_changed(&id);
			}
		});
	}

	/// Discards the cached query and recomputes it when `reset` is set.
	///
	/// A non-reset refresh does nothing. Calls made while a reset is running
	/// join that reset instead of starting another.
	pub async fn refresh(&self, reset: bool) {
		tracing::debug!(node = %self.id, reset, "results.refresh");
		if !reset {
			return;
		}

		let query = Arc::clone(&self.query);
		let run = self.refresh_gate.enter(move || async move {
			query.invalidate();
			if let Err(err) = query.get().await {
				tracing::debug!(error = %err, "results.refresh.query_failed");
			}
		});
		run.instrument(tracing::debug_span!("results.refresh", node = %self.id)).await;
	}
}
