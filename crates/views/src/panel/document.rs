use std::path::Path;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use regex::{NoExpand, Regex};

use super::{PanelView, RenderHook};
use crate::env::Environment;
use crate::{Error, Result};

/// Directory under the extension root holding panel templates.
pub const TEMPLATE_DIR: &str = "webviews";

static ROOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{root\}\}").expect("valid root placeholder"));
static HEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\{\{\s*head\s*\}\}").expect("valid head placeholder"));
static BODY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\{\{\s*body\s*\}\}").expect("valid body placeholder"));
static END_OF_BODY: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)\{\{\s*endOfBody\s*\}\}").expect("valid endOfBody placeholder"));

/// Substitutes placeholders in `template`.
///
/// Every `{{root}}` becomes `root`. The first `{{head}}`, `{{body}}` and
/// `{{endOfBody}}` (case-insensitive, inner whitespace allowed) are replaced
/// by the matching hook of `view` when it has one. Every hook the view has
/// is rendered, whether or not the template carries its placeholder.
pub async fn render_template(template: &str, root: &str, view: &dyn PanelView) -> Result<String> {
	let mut html = ROOT.replace_all(template, NoExpand(root)).into_owned();

	let hooks: [(&'static str, &Regex, Option<&dyn RenderHook>); 3] = [
		("head", &*HEAD, view.head()),
		("body", &*BODY, view.body()),
		("endOfBody", &*END_OF_BODY, view.end_of_body()),
	];
	for (name, placeholder, hook) in hooks {
		let Some(hook) = hook else { continue };
		let fragment = hook.render().await.map_err(|err| match err {
			err @ Error::Render { .. } => err,
			err => Error::Render {
				fragment: name,
				message: err.to_string(),
			},
		})?;
		html = placeholder.replace(&html, NoExpand(&fragment)).into_owned();
	}
	Ok(html)
}

/// Rendered document of one controller.
///
/// Reused across renders outside debugging mode; while debugging, the
/// template is re-read and re-rendered every time.
#[derive(Debug, Default)]
pub(crate) struct DocumentCache {
	html: Mutex<Option<Arc<str>>>,
}

impl DocumentCache {
	pub(crate) async fn render(&self, view: &dyn PanelView, env: &Environment) -> Result<Arc<str>> {
		let cached = if env.is_debugging() { None } else { self.html.lock().clone() };
		if let Some(html) = cached {
			return Ok(html);
		}

		let path = env.as_absolute_path(Path::new(TEMPLATE_DIR).join(view.filename()));
		let template = tokio::fs::read_to_string(&path)
			.await
			.map_err(|err| Error::template_load(path.clone(), err))?;
		let html: Arc<str> = render_template(&template, &env.resource_root()?, view).await?.into();
		tracing::trace!(path = %path.display(), bytes = html.len(), "panel.document.rendered");

		if !env.is_debugging() {
			*self.html.lock() = Some(Arc::clone(&html));
		}
		Ok(html)
	}

	pub(crate) fn clear(&self) {
		self.html.lock().take();
	}
}
