//! Groups path-carrying items into a folder tree.

use indexmap::IndexMap;

/// A synthetic folder built by [`make_hierarchical`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder<T> {
	/// Display name; after compaction the joined chain of names.
	pub name: String,
	/// Normalized path of the folder from the hierarchy root.
	pub relative_path: String,
	/// Child folders keyed by normalized path, in first-seen order.
	pub folders: IndexMap<String, Folder<T>>,
	/// Items placed directly in this folder, in input order.
	pub leaves: Vec<T>,
}

impl<T> Folder<T> {
	fn new(name: String, relative_path: String) -> Self {
		Self {
			name,
			relative_path,
			folders: IndexMap::new(),
			leaves: Vec::new(),
		}
	}

	/// Number of items at or below this folder.
	pub fn leaf_count(&self) -> usize {
		self.leaves.len() + self.folders.values().map(Folder::leaf_count).sum::<usize>()
	}

	/// Flattens the folder back into its items, depth first.
	pub fn into_leaves(self) -> Vec<T> {
		let mut out = Vec::with_capacity(self.leaf_count());
		self.collect_leaves(&mut out);
		out
	}

	fn collect_leaves(self, out: &mut Vec<T>) {
		out.extend(self.leaves);
		for (_, folder) in self.folders {
			folder.collect_leaves(out);
		}
	}

	/// Compacts every child chain and re-keys each child by its merged path.
	fn compact(&mut self, join: &impl Fn(&[&str]) -> String) {
		self.folders = std::mem::take(&mut self.folders)
			.into_values()
			.map(|mut folder| {
				folder.compact(join);
				folder.absorb_single_child(join);
				(folder.relative_path.clone(), folder)
			})
			.collect();
	}

	/// Merges a lone child folder into this one while this folder holds no items.
	fn absorb_single_child(&mut self, join: &impl Fn(&[&str]) -> String) {
		while self.leaves.is_empty() && self.folders.len() == 1 {
			let Some((_, child)) = self.folders.pop() else {
				break;
			};
			self.name = join(&[&self.name, &child.name]);
			self.relative_path = child.relative_path;
			self.folders = child.folders;
			self.leaves = child.leaves;
		}
	}
}

/// Builds a folder tree from `items`.
///
/// `split` returns the folder segments of an item (its directory, not its own
/// name). `join` turns segments into a normalized path; folders are memoized
/// by that path and carry it as their `relative_path`. The returned root is
/// nameless and never merged into its children. With `compact`, a chain of
/// folders that each hold exactly one child folder and no items collapses
/// into one folder named by the joined chain.
pub fn make_hierarchical<T, S, J>(items: impl IntoIterator<Item = T>, split: S, join: J, compact: bool) -> Folder<T>
where
	S: Fn(&T) -> Vec<String>,
	J: Fn(&[&str]) -> String,
{
	let mut root = Folder::new(String::new(), String::new());

	for item in items {
		let segments = split(&item);
		let mut folder = &mut root;
		for depth in 0..segments.len() {
			let prefix: Vec<&str> = segments[..=depth].iter().map(String::as_str).collect();
			let path = join(&prefix);
			folder = folder
				.folders
				.entry(path.clone())
				.or_insert_with(|| Folder::new(segments[depth].clone(), path));
		}
		folder.leaves.push(item);
	}

	if compact {
		root.compact(&join);
	}
	root
}

/// Joins segments with `/`, dropping empty segments.
pub fn join_path(segments: &[&str]) -> String {
	segments
		.iter()
		.flat_map(|s| s.split('/'))
		.filter(|s| !s.is_empty())
		.collect::<Vec<_>>()
		.join("/")
}

/// Directory segments of a `/`-separated file path.
pub fn dir_segments(path: &str) -> Vec<String> {
	let mut segments: Vec<String> = path.split('/').filter(|s| !s.is_empty()).map(str::to_owned).collect();
	segments.pop();
	segments
}
