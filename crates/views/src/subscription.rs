//! Cancelable registrations.

use std::panic::{AssertUnwindSafe, catch_unwind};

/// A registration that can be released once.
///
/// Released on [`Subscription::dispose`] or drop, whichever comes first.
#[must_use = "dropping a subscription releases it immediately"]
pub struct Subscription {
	release: Option<Box<dyn FnOnce() + Send>>,
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription").field("active", &self.release.is_some()).finish()
	}
}

impl Subscription {
	/// Creates a subscription that runs `release` when disposed.
	pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
		Self {
			release: Some(Box::new(release)),
		}
	}

	/// A subscription with nothing to release.
	pub fn empty() -> Self {
		Self { release: None }
	}

	/// Releases the registration.
	pub fn dispose(mut self) {
		self.release_now();
	}

	/// Runs the release callback; a panic is logged and swallowed.
	fn release_now(&mut self) {
		if let Some(release) = self.release.take()
			&& let Err(payload) = catch_unwind(AssertUnwindSafe(release))
		{
			tracing::warn!(panic = panic_message(payload.as_ref()), "subscription.release_panicked");
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.release_now();
	}
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
	if let Some(s) = payload.downcast_ref::<&'static str>() {
		s
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s
	} else {
		"<non-string panic>"
	}
}

/// Registrations released together.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
	items: Vec<Subscription>,
}

impl SubscriptionSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds one registration.
	pub fn push(&mut self, subscription: Subscription) {
		self.items.push(subscription);
	}

	/// Number of live registrations.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Releases every registration in insertion order.
	///
	/// A failing release does not stop the rest. The set is empty afterwards
	/// and can be disposed again.
	pub fn dispose(&mut self) {
		for subscription in self.items.drain(..) {
			subscription.dispose();
		}
	}
}

impl Extend<Subscription> for SubscriptionSet {
	fn extend<I: IntoIterator<Item = Subscription>>(&mut self, iter: I) {
		self.items.extend(iter);
	}
}

impl Drop for SubscriptionSet {
	fn drop(&mut self) {
		self.dispose();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	fn counting(counter: &Arc<AtomicUsize>) -> Subscription {
		let counter = Arc::clone(counter);
		Subscription::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);
		})
	}

	#[test]
	fn releases_once() {
		let released = Arc::new(AtomicUsize::new(0));
		let mut set = SubscriptionSet::new();
		set.push(counting(&released));
		set.dispose();
		set.dispose();
		drop(set);
		assert_eq!(released.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn panicking_release_does_not_stop_the_rest() {
		let released = Arc::new(AtomicUsize::new(0));
		let mut set = SubscriptionSet::new();
		set.push(counting(&released));
		set.push(Subscription::new(|| panic!("listener already gone")));
		set.push(counting(&released));
		set.dispose();
		assert_eq!(released.load(Ordering::SeqCst), 2);
		assert!(set.is_empty());
	}

	#[test]
	fn drop_releases() {
		let released = Arc::new(AtomicUsize::new(0));
		drop(counting(&released));
		assert_eq!(released.load(Ordering::SeqCst), 1);
	}
}
