use vellum_ipc::protocol::UpdateConfigurationParams;

use crate::Result;
use crate::host::{ConfigStore, ConfigTarget};

/// Applies a panel's configuration-update request to `store`.
///
/// A change whose value equals the setting's default clears the override
/// instead of persisting the default, so the setting keeps following future
/// default changes. Every key in `removes` is cleared. All writes are
/// attempted; the first failure is returned after the rest have run.
pub async fn apply_configuration_update(store: &dyn ConfigStore, params: UpdateConfigurationParams) -> Result<()> {
	let target = if params.is_workspace_scope() {
		ConfigTarget::Workspace
	} else {
		ConfigTarget::Global
	};

	let writes = params
		.changes
		.into_iter()
		.map(|(key, value)| {
			let value = if store.inspect_default(&key).as_ref() == Some(&value) {
				None
			} else {
				Some(value)
			};
			(key, value)
		})
		.chain(params.removes.into_iter().map(|key| (key, None)));

	let mut first_error = None;
	for (key, value) in writes {
		tracing::debug!(key = %key, clear = value.is_none(), ?target, "panel.configuration.update");
		if let Err(err) = store.update(&key, value, target).await {
			tracing::warn!(key = %key, error = %err, "panel.configuration.update_failed");
			first_error.get_or_insert(err);
		}
	}
	first_error.map_or(Ok(()), Err)
}
