//! Envelope id generation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Largest integer a JavaScript number represents exactly (`2^53 - 1`).
///
/// Panel scripts parse ids as numbers, so the sequence wraps here rather than
/// at `u64::MAX`.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Sequence number of an outbound envelope, rendered as `host:<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IpcId(pub u64);

impl fmt::Display for IpcId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "host:{}", self.0)
	}
}

impl From<IpcId> for String {
	fn from(id: IpcId) -> Self {
		id.to_string()
	}
}

/// Monotonic envelope id generator.
///
/// Ids start at 1, increase by one per call, and wrap back to 1 after
/// [`MAX_SAFE_INTEGER`]. Zero is never produced. The counter is lock-free, so
/// ids taken from one sequence by several controllers are still strictly
/// increasing in call order.
#[derive(Debug, Default)]
pub struct IpcSequence {
	last: AtomicU64,
}

static GLOBAL: IpcSequence = IpcSequence::new();

impl IpcSequence {
	/// Creates a sequence whose first id is 1.
	#[must_use]
	pub const fn new() -> Self {
		Self::starting_after(0)
	}

	/// Creates a sequence whose first id follows `last`.
	#[must_use]
	pub const fn starting_after(last: u64) -> Self {
		Self { last: AtomicU64::new(last) }
	}

	/// Returns the process-wide sequence shared by every panel controller.
	///
	/// Initialized at process start and never reset.
	pub fn global() -> &'static Self {
		&GLOBAL
	}

	/// Takes the next id.
	#[allow(clippy::should_implement_trait, reason = "convention")]
	pub fn next(&self) -> IpcId {
		let prev = self
			.last
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(Self::successor(last)))
			.unwrap_or_else(|last| last);
		IpcId(Self::successor(prev))
	}

	const fn successor(last: u64) -> u64 {
		if last >= MAX_SAFE_INTEGER { 1 } else { last + 1 }
	}
}
