//! Settings that shape how result trees are presented.

use serde::Deserialize;

use crate::host::ConfigStore;

/// Section of the configuration snapshot holding [`ViewConfig`].
pub const VIEWS_SECTION: &str = "views";

/// How file entries are arranged under a results node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilesLayout {
	/// Flat, sorted list.
	List,
	/// Folder hierarchy.
	#[default]
	Tree,
	/// Tree once the file count exceeds the configured threshold, list otherwise.
	Auto,
}

/// File presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilesViewConfig {
	/// Arrangement of file entries.
	pub layout: FilesLayout,
	/// Collapse single-child folder chains into one folder.
	pub compact: bool,
	/// File count above which [`FilesLayout::Auto`] switches to a tree.
	pub threshold: usize,
}

impl Default for FilesViewConfig {
	fn default() -> Self {
		Self {
			layout: FilesLayout::default(),
			compact: true,
			threshold: 5,
		}
	}
}

impl FilesViewConfig {
	/// Returns true if `count` files should be shown as a hierarchy.
	pub fn use_tree(&self, count: usize) -> bool {
		match self.layout {
			FilesLayout::List => false,
			FilesLayout::Tree => true,
			FilesLayout::Auto => count > self.threshold,
		}
	}
}

/// Settings for result tree views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
	/// File presentation.
	pub files: FilesViewConfig,
}

impl ViewConfig {
	/// Reads the [`VIEWS_SECTION`] of the store's raw snapshot.
	///
	/// Missing or malformed settings fall back to defaults.
	pub fn from_store(store: &dyn ConfigStore) -> Self {
		let Some(section) = store.raw_snapshot().get(VIEWS_SECTION).cloned() else {
			return Self::default();
		};
		serde_json::from_value(section).unwrap_or_else(|err| {
			tracing::warn!(error = %err, "views.config.invalid");
			Self::default()
		})
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::testing::MemoryConfigStore;

	#[test]
	fn auto_layout_switches_on_threshold() {
		let config = FilesViewConfig {
			layout: FilesLayout::Auto,
			threshold: 2,
			..Default::default()
		};
		assert!(!config.use_tree(2));
		assert!(config.use_tree(3));
	}

	#[test]
	fn reads_partial_section_from_store() {
		let store = MemoryConfigStore::new(json!({}));
		store.set_user("views", json!({ "files": { "layout": "list" } }));
		let config = ViewConfig::from_store(&store);
		assert_eq!(config.files.layout, FilesLayout::List);
		assert!(config.files.compact);
	}

	#[test]
	fn malformed_section_falls_back_to_defaults() {
		let store = MemoryConfigStore::new(json!({}));
		store.set_user("views", json!({ "files": { "layout": 3 } }));
		assert_eq!(ViewConfig::from_store(&store), ViewConfig::default());
	}
}
