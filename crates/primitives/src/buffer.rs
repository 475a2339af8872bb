//! The versioned view buffer and the tracking points that follow its
//! edits.
//!
//! The view buffer records one [`Delta`] per version step. A snapshot
//! carries the text, the version, and the recorded history, so a
//! [`TrackingPoint`] taken at any earlier version can be re-resolved
//! against it without touching the live buffer.

use std::sync::Arc;

use ropey::Rope;

use crate::delta::{Bias, Delta};
use crate::span::{ViewOffset, ViewSpan};

/// Unique identifier for a buffer participating in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// The buffer the user sees and types into.
///
/// Edits bump the version and append the corresponding delta, so
/// `history[i]` maps version `i` to version `i + 1`.
pub struct ViewBuffer {
	text: Rope,
	version: u64,
	history: Vec<Arc<Delta>>,
}

impl ViewBuffer {
	/// Creates a buffer at version 0 with the given content.
	pub fn from_text(text: &str) -> Self {
		Self {
			text: Rope::from_str(text),
			version: 0,
			history: Vec::new(),
		}
	}

	/// Returns the current version.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Returns the length of the buffer in characters.
	pub fn len(&self) -> usize {
		self.text.len_chars()
	}

	/// Returns true if the buffer is empty.
	pub fn is_empty(&self) -> bool {
		self.text.len_chars() == 0
	}

	/// Replaces `span` with `text`, advancing the version by one.
	pub fn replace(&mut self, span: ViewSpan, text: &str) {
		let delta = Delta::replace(self.text.len_chars(), span.start.0, span.end.0, text);
		delta.apply(&mut self.text);
		self.history.push(Arc::new(delta));
		self.version += 1;
	}

	/// Inserts `text` at `at`, advancing the version by one.
	pub fn insert(&mut self, at: ViewOffset, text: &str) {
		self.replace(ViewSpan::point(at), text);
	}

	/// Takes an immutable snapshot of the current state.
	pub fn snapshot(&self) -> ViewSnapshot {
		ViewSnapshot {
			text: self.text.clone(),
			version: self.version,
			history: self.history.clone(),
		}
	}
}

/// An immutable view of the buffer at one version.
///
/// Holds the delta history up to its version; resolving a tracking
/// point needs only the snapshot, never the live buffer.
#[derive(Clone)]
pub struct ViewSnapshot {
	text: Rope,
	version: u64,
	history: Vec<Arc<Delta>>,
}

impl ViewSnapshot {
	/// Returns the snapshot's version.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Returns the length of the snapshot in characters.
	pub fn len(&self) -> usize {
		self.text.len_chars()
	}

	/// Returns true if the snapshot is empty.
	pub fn is_empty(&self) -> bool {
		self.text.len_chars() == 0
	}

	/// Returns the snapshot text.
	pub fn content(&self) -> &Rope {
		&self.text
	}

	/// Returns the text occupying `span`, clamped to the snapshot.
	pub fn text_in(&self, span: ViewSpan) -> String {
		let len = self.text.len_chars();
		let start = span.start.0.min(len);
		let end = span.end.0.min(len).max(start);
		self.text.slice(start..end).to_string()
	}

	/// Anchors a tracking point at `at`, valid from this version on.
	pub fn anchor(&self, at: ViewOffset, bias: Bias) -> TrackingPoint {
		TrackingPoint::new(at, self.version, bias)
	}
}

/// A position in the view buffer that follows the text as it is
/// edited.
///
/// With [`Bias::Right`] an insertion exactly at the point pushes it
/// forward; with [`Bias::Left`] the point stays put. Only meaningful
/// for snapshots of the buffer it was anchored in, at the same or a
/// later version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingPoint {
	offset: ViewOffset,
	version: u64,
	bias: Bias,
}

impl TrackingPoint {
	/// Creates a tracking point at `offset`, anchored at `version`.
	pub fn new(offset: ViewOffset, version: u64, bias: Bias) -> Self {
		Self {
			offset,
			version,
			bias,
		}
	}

	/// The offset the point was anchored at.
	pub fn offset(&self) -> ViewOffset {
		self.offset
	}

	/// The version the point was anchored at.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// The point's bias policy.
	pub fn bias(&self) -> Bias {
		self.bias
	}

	/// Resolves the point's position in `snapshot` by mapping through
	/// every delta recorded between the two versions.
	///
	/// A snapshot older than the point cannot be mapped against; the
	/// anchored offset is returned unchanged in that case.
	pub fn position_in(&self, snapshot: &ViewSnapshot) -> ViewOffset {
		debug_assert!(self.version <= snapshot.version);
		let lo = self.version as usize;
		let hi = snapshot.version as usize;
		let Some(deltas) = snapshot.history.get(lo..hi) else {
			return self.offset;
		};

		let mut pos = self.offset.0;
		for delta in deltas {
			pos = delta.map_pos(pos, self.bias);
		}
		ViewOffset(pos)
	}
}
