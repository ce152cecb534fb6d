use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

/// Coalesces overlapping runs of one async operation.
///
/// While a run is in flight, [`enter`](Self::enter) hands late callers the
/// running future instead of starting another; once it finishes the next
/// call starts a new run.
pub(crate) struct Gate<T: Clone> {
	running: Mutex<Option<Shared<BoxFuture<'static, T>>>>,
}

impl<T> Gate<T>
where
	T: Clone + Send + Sync + 'static,
{
	pub(crate) fn new() -> Self {
		Self { running: Mutex::new(None) }
	}

	/// Joins the in-flight run, or starts `start()` as a new one.
	pub(crate) fn enter<F, Fut>(&self, start: F) -> Shared<BoxFuture<'static, T>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = T> + Send + 'static,
	{
		let mut running = self.running.lock();
		if let Some(run) = running.as_ref()
			&& run.peek().is_none()
		{
			return run.clone();
		}
		let run = start().boxed().shared();
		*running = Some(run.clone());
		run
	}
}
