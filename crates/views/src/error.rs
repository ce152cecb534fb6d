//! Error types for panels and result trees.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by document rendering, data queries and configuration writes.
///
/// Cloneable so one failure can be handed to every waiter of a coalesced
/// computation.
#[derive(Debug, Clone, Error)]
pub enum Error {
	/// The panel's document template could not be read.
	#[error("failed to load template {path}: {error}")]
	TemplateLoad {
		/// Template file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: Arc<std::io::Error>,
	},

	/// The extension root is not an absolute path and has no resource URI.
	#[error("extension root is not an absolute path: {0}")]
	InvalidRoot(PathBuf),

	/// A view's render hook failed.
	#[error("failed to render {fragment}: {message}")]
	Render {
		/// Placeholder the hook was filling.
		fragment: &'static str,
		/// Hook error text.
		message: String,
	},

	/// The diff provider failed.
	#[error("diff provider failed: {0}")]
	Provider(Arc<dyn std::error::Error + Send + Sync>),

	/// The configuration store rejected a write.
	#[error("failed to update setting {key}: {message}")]
	ConfigUpdate {
		/// Setting key being written.
		key: String,
		/// Store error text.
		message: String,
	},
}

impl Error {
	/// Wraps an arbitrary provider failure.
	pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
		Self::Provider(Arc::new(err))
	}

	pub(crate) fn template_load(path: PathBuf, error: std::io::Error) -> Self {
		Self::TemplateLoad {
			path,
			error: Arc::new(error),
		}
	}
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, Error>;
