//! Memoized, replaceable async computation slot.

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

use crate::Error;

/// Future handed to every caller of [`ResultCell::get`].
pub type CellFuture<T, E = Error> = Shared<BoxFuture<'static, Result<T, E>>>;

type Compute<T, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Holds at most one computation of a result.
///
/// The first [`get`](Self::get) creates the computation and starts it on the
/// ambient runtime; every later call receives a clone of the same future
/// until [`invalidate`](Self::invalidate) empties the slot. Invalidation does
/// not cancel a running computation: it keeps running to completion, but no
/// caller arriving after the invalidation ever sees its result.
pub struct ResultCell<T, E = Error> {
	compute: Compute<T, E>,
	slot: Mutex<Option<CellFuture<T, E>>>,
}

impl<T, E> fmt::Debug for ResultCell<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResultCell").field("populated", &self.slot.lock().is_some()).finish_non_exhaustive()
	}
}

impl<T, E> ResultCell<T, E>
where
	T: Clone + Send + Sync + 'static,
	E: Clone + Send + Sync + 'static,
{
	/// Creates an empty cell that computes its value with `compute`.
	pub fn new<F>(compute: F) -> Self
	where
		F: Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync + 'static,
	{
		Self {
			compute: Arc::new(compute),
			slot: Mutex::new(None),
		}
	}

	/// Returns the current computation, creating it if the slot is empty.
	pub fn get(&self) -> CellFuture<T, E> {
		let mut slot = self.slot.lock();
		if let Some(fut) = slot.as_ref() {
			return fut.clone();
		}

		let fut = (self.compute)().shared();
		let driver = fut.clone();
		let _ = crate::spawn::spawn("cache.compute", async move {
			let _ = driver.await;
		});
		*slot = Some(fut.clone());
		fut
	}

	/// Empties the slot so the next [`get`](Self::get) starts afresh.
	pub fn invalidate(&self) {
		self.slot.lock().take();
	}

	/// Returns the result if the current computation has finished.
	pub fn peek(&self) -> Option<Result<T, E>> {
		self.slot.lock().as_ref().and_then(|fut| fut.peek().cloned())
	}
}
