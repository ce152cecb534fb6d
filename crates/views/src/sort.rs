//! Sibling ordering for tree entries.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// An entry that can be ordered among its siblings.
pub trait Sortable {
	/// Lower values sort first.
	fn priority(&self) -> i32;

	/// Display label used as the tie breaker.
	fn sort_label(&self) -> &str;
}

/// Sorts by priority, then by [`compare_labels`].
///
/// The sort is stable, so labels that compare equal keep their input order.
pub fn sort_entries<T: Sortable>(entries: &mut [T]) {
	entries.sort_by(|a, b| a.priority().cmp(&b.priority()).then_with(|| compare_labels(a.sort_label(), b.sort_label())));
}

/// Case-insensitive comparison that orders digit runs by numeric value.
///
/// Accented letters compare as their base letter. `file2` sorts before
/// `file10`, `élan` before `face`, and `Readme` equals `README`.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
	let (a, b) = (fold(a), fold(b));
	let mut a = a.chars().peekable();
	let mut b = b.chars().peekable();
	loop {
		let ord = match (a.peek().copied(), b.peek().copied()) {
			(None, None) => return Ordering::Equal,
			(None, Some(_)) => return Ordering::Less,
			(Some(_), None) => return Ordering::Greater,
			(Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
				let x = digit_run(&mut a);
				let y = digit_run(&mut b);
				let (x, y) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
				x.len().cmp(&y.len()).then_with(|| x.cmp(y))
			}
			(Some(x), Some(y)) => {
				a.next();
				b.next();
				x.cmp(&y)
			}
		};
		if ord != Ordering::Equal {
			return ord;
		}
	}
}

/// Lowercased base letters: canonical decomposition with combining marks removed.
fn fold(label: &str) -> String {
	label.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
	let mut run = String::new();
	while let Some(c) = chars.next_if(char::is_ascii_digit) {
		run.push(c);
	}
	run
}
