use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

/// The ambient runtime, or a lazily built shared one when the caller is on a
/// host thread outside any runtime.
fn runtime_handle() -> Handle {
	if let Ok(handle) = Handle::try_current() {
		return handle;
	}

	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	let runtime = FALLBACK.get_or_init(|| {
		tracing::debug!("views.spawn.fallback_runtime");
		Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("vellum-views")
			.build()
			.expect("failed to build vellum-views fallback runtime")
	});
	runtime.handle().clone()
}

/// Spawns detached work on the ambient runtime, or on the shared fallback
/// runtime when called from a thread without one.
pub(crate) fn spawn<F>(label: &'static str, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(task = label, "views.spawn");
	runtime_handle().spawn(fut)
}

#[cfg(test)]
mod tests {
	use std::sync::mpsc;
	use std::time::Duration;

	use super::*;

	#[test]
	fn runs_work_spawned_from_a_plain_thread() {
		let (tx, rx) = mpsc::channel();
		std::thread::spawn(move || {
			let _ = spawn("test.plain_thread", async move {
				let _ = tx.send(Handle::current().runtime_flavor());
			});
		})
		.join()
		.unwrap();

		let flavor = rx.recv_timeout(Duration::from_secs(5)).unwrap();
		assert_eq!(flavor, tokio::runtime::RuntimeFlavor::MultiThread);
	}

	#[tokio::test(flavor = "current_thread")]
	async fn prefers_the_ambient_runtime() {
		let flavor = spawn("test.ambient", async { Handle::current().runtime_flavor() }).await.unwrap();
		assert_eq!(flavor, tokio::runtime::RuntimeFlavor::CurrentThread);
	}
}
