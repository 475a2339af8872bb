//! Edit deltas: a compact retain/delete/insert encoding of one buffer
//! edit, applied to a rope and used to map positions across versions.

use ropey::Rope;

/// How a position sitting exactly on an edit boundary maps through a
/// [`Delta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// The position stays before text inserted at that position.
	Left,
	/// The position moves past text inserted at that position.
	Right,
}

/// A run of characters retained, deleted, or inserted.
///
/// The insert variant caches its character count; rope edits and
/// position mapping both need it and `chars().count()` is O(n).
#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
	Retain(usize),
	Delete(usize),
	Insert { text: String, chars: usize },
}

/// One edit to a document, encoded as operation runs over the text as
/// it was before the edit.
///
/// A delta is immutable once built. The view buffer records one delta
/// per version step, which is what makes [`TrackingPoint`] resolution
/// possible long after the edit happened.
///
/// [`TrackingPoint`]: crate::buffer::TrackingPoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
	ops: Vec<Op>,
	len_before: usize,
	len_after: usize,
}

impl Delta {
	/// Builds the delta that replaces `[start, end)` of a document of
	/// `len_before` characters with `text`.
	///
	/// Insertion is ordered before deletion so positions inside the
	/// replaced region map to the end of the replacement text.
	pub fn replace(len_before: usize, start: usize, end: usize, text: &str) -> Self {
		debug_assert!(start <= end && end <= len_before);
		let chars = text.chars().count();

		let mut ops = Vec::new();
		if start > 0 {
			ops.push(Op::Retain(start));
		}
		if chars > 0 {
			ops.push(Op::Insert {
				text: text.to_string(),
				chars,
			});
		}
		if end > start {
			ops.push(Op::Delete(end - start));
		}
		if len_before > end {
			ops.push(Op::Retain(len_before - end));
		}

		Self {
			ops,
			len_before,
			len_after: len_before - (end - start) + chars,
		}
	}

	/// Length of the document before the edit, in characters.
	pub fn len_before(&self) -> usize {
		self.len_before
	}

	/// Length of the document after the edit, in characters.
	pub fn len_after(&self) -> usize {
		self.len_after
	}

	/// Applies this delta to `doc`, modifying it in place.
	///
	/// `doc` must have exactly `len_before` characters.
	pub fn apply(&self, doc: &mut Rope) {
		debug_assert_eq!(doc.len_chars(), self.len_before);

		let mut pos = 0;
		for op in &self.ops {
			match op {
				Op::Retain(n) => pos += n,
				Op::Delete(n) => doc.remove(pos..pos + n),
				Op::Insert { text, chars } => {
					doc.insert(pos, text);
					pos += chars;
				}
			}
		}
	}

	/// Maps a pre-edit position to the corresponding post-edit position.
	///
	/// Positions inside a deleted run collapse to the run's mapped
	/// start. For a position exactly at an insertion, `bias` decides
	/// which side of the new text it lands on.
	pub fn map_pos(&self, pos: usize, bias: Bias) -> usize {
		let mut old_pos = 0;
		let mut new_pos = 0;

		for op in &self.ops {
			if old_pos > pos {
				break;
			}

			match op {
				Op::Retain(n) => {
					if old_pos + n > pos {
						return new_pos + (pos - old_pos);
					}
					old_pos += n;
					new_pos += n;
				}
				Op::Delete(n) => {
					if old_pos + n > pos {
						return new_pos;
					}
					old_pos += n;
				}
				Op::Insert { chars, .. } => {
					if old_pos == pos && bias == Bias::Left {
						// Boundary position stays before the insertion.
					} else {
						new_pos += chars;
					}
				}
			}
		}

		new_pos + pos.saturating_sub(old_pos)
	}
}
