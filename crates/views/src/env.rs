//! Runtime environment of the hosting extension.

use std::path::{Path, PathBuf};

use url::Url;

use crate::{Error, Result};

/// Environment variable that switches on live template authoring.
pub const DEBUG_ENV_VAR: &str = "VELLUM_DEBUG";

/// URI scheme under which panels may load files from the extension root.
const RESOURCE_SCHEME: &str = "vscode-resource";

/// Where the extension is installed and whether it runs under a debugger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
	extension_root: PathBuf,
	debugging: bool,
}

impl Environment {
	/// Creates a non-debugging environment rooted at `extension_root`.
	pub fn new(extension_root: impl Into<PathBuf>) -> Self {
		Self {
			extension_root: extension_root.into(),
			debugging: false,
		}
	}

	/// Creates an environment whose debugging flag comes from [`DEBUG_ENV_VAR`].
	pub fn from_env(extension_root: impl Into<PathBuf>) -> Self {
		let debugging = std::env::var(DEBUG_ENV_VAR).is_ok_and(|v| matches!(v.trim(), "1" | "true"));
		Self::new(extension_root).debugging(debugging)
	}

	/// Sets the debugging flag.
	///
	/// While debugging, templates are re-read on every render so edits show up
	/// without reloading the extension.
	pub fn debugging(mut self, debugging: bool) -> Self {
		self.debugging = debugging;
		self
	}

	/// Returns true when running in live authoring mode.
	pub fn is_debugging(&self) -> bool {
		self.debugging
	}

	/// Extension install root.
	pub fn extension_root(&self) -> &Path {
		&self.extension_root
	}

	/// Resolves a path relative to the extension root.
	pub fn as_absolute_path(&self, relative: impl AsRef<Path>) -> PathBuf {
		self.extension_root.join(relative)
	}

	/// Resource URI of the extension root, substituted for `{{root}}`.
	pub fn resource_root(&self) -> Result<String> {
		let url = Url::from_file_path(&self.extension_root).map_err(|()| Error::InvalidRoot(self.extension_root.clone()))?;
		Ok(format!("{RESOURCE_SCHEME}:{}", url.path()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[cfg(unix)]
	#[test]
	fn resource_root_uses_resource_scheme() {
		let env = Environment::new("/opt/ext");
		assert_eq!(env.resource_root().unwrap(), "vscode-resource:/opt/ext");
	}

	#[test]
	fn relative_root_has_no_resource_uri() {
		let env = Environment::new("relative/ext");
		assert!(matches!(env.resource_root(), Err(Error::InvalidRoot(_))));
	}

	#[test]
	fn builder_sets_debugging() {
		assert!(!Environment::new("/x").is_debugging());
		assert!(Environment::new("/x").debugging(true).is_debugging());
	}
}
