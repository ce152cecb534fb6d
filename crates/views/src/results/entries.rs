use super::{CollapsibleState, FileChange, TreeItem};
use crate::hierarchy::Folder;
use crate::sort::{Sortable, sort_entries};

/// Priority of folders; below every file so folders list first.
const FOLDER_PRIORITY: i32 = -1;
const FILE_PRIORITY: i32 = 0;

/// A child of a results node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
	/// Synthetic folder.
	Folder(FolderNode),
	/// Changed file.
	File(FileNode),
}

impl TreeNode {
	/// Stable node identity.
	pub fn id(&self) -> &str {
		match self {
			Self::Folder(folder) => &folder.id,
			Self::File(file) => &file.id,
		}
	}

	/// Display state.
	pub fn tree_item(&self) -> TreeItem {
		match self {
			Self::Folder(folder) => folder.tree_item(),
			Self::File(file) => file.tree_item(),
		}
	}

	/// Children; files have none.
	pub fn children(&self) -> &[TreeNode] {
		match self {
			Self::Folder(folder) => &folder.children,
			Self::File(_) => &[],
		}
	}
}

impl Sortable for TreeNode {
	fn priority(&self) -> i32 {
		match self {
			Self::Folder(_) => FOLDER_PRIORITY,
			Self::File(_) => FILE_PRIORITY,
		}
	}

	fn sort_label(&self) -> &str {
		match self {
			Self::Folder(folder) => &folder.name,
			Self::File(file) => file.file_name(),
		}
	}
}

/// A folder grouping files of a results node.
///
/// Owned by the node that built it and rebuilt on every children query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
	id: String,
	name: String,
	relative_path: String,
	children: Vec<TreeNode>,
}

impl FolderNode {
	/// Converts the children of `root` into sorted nodes. The root itself is
	/// not represented.
	pub(crate) fn children_of(owner_id: &str, root: Folder<FileNode>) -> Vec<TreeNode> {
		let mut children: Vec<TreeNode> = root
			.folders
			.into_values()
			.map(|folder| TreeNode::Folder(Self::from_folder(owner_id, folder)))
			.chain(root.leaves.into_iter().map(TreeNode::File))
			.collect();
		sort_entries(&mut children);
		children
	}

	fn from_folder(owner_id: &str, folder: Folder<FileNode>) -> Self {
		Self {
			id: format!("{owner_id}:folder:{}", folder.relative_path),
			name: folder.name.clone(),
			relative_path: folder.relative_path.clone(),
			children: Self::children_of(owner_id, folder),
		}
	}

	/// Display name; joined chain of names when compacted.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Repository-relative folder path.
	pub fn relative_path(&self) -> &str {
		&self.relative_path
	}

	/// Sorted child folders and files.
	pub fn children(&self) -> &[TreeNode] {
		&self.children
	}

	/// Display state.
	pub fn tree_item(&self) -> TreeItem {
		TreeItem {
			id: self.id.clone(),
			label: self.name.clone(),
			description: None,
			collapsible_state: CollapsibleState::Expanded,
			context_value: "vellum:folder",
		}
	}
}

/// A changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
	id: String,
	change: FileChange,
}

impl FileNode {
	pub(crate) fn new(owner_id: &str, change: FileChange) -> Self {
		Self {
			id: format!("{owner_id}:file:{}", change.path),
			change,
		}
	}

	/// The change this node presents.
	pub fn change(&self) -> &FileChange {
		&self.change
	}

	/// Last path segment.
	pub fn file_name(&self) -> &str {
		self.change.path.rsplit('/').next().unwrap_or(&self.change.path)
	}

	/// Directory part of the path, if any.
	pub fn directory(&self) -> Option<&str> {
		self.change.path.rsplit_once('/').map(|(dir, _)| dir).filter(|dir| !dir.is_empty())
	}

	/// Display state.
	pub fn tree_item(&self) -> TreeItem {
		TreeItem {
			id: self.id.clone(),
			label: self.file_name().to_owned(),
			description: self.directory().map(str::to_owned),
			collapsible_state: CollapsibleState::None,
			context_value: "vellum:file",
		}
	}
}
