//! Live text resolution for tracked spans.
//!
//! During one filtering/render pass the same spans are resolved over
//! and over (typed-text extraction, uniqueness checks, builder text), so
//! a [`ViewTextResolver`] memoizes by the *original* subject span. A
//! resolver lives for exactly one pass over one projection map; results
//! are never invalidated.

use rustc_hash::FxHashMap;
use tracing::warn;
use vellum_primitives::{Bias, BufferId, SubjectSpan, TrackingPoint, ViewOffset, ViewSnapshot, ViewSpan};

use crate::map::{ProjectionError, ProjectionMap};

/// Resolves the text currently occupying tracked spans of one subject
/// buffer.
pub struct ViewTextResolver<'a> {
	map: &'a ProjectionMap,
	buffer: BufferId,
	cache: FxHashMap<SubjectSpan, String>,
}

impl<'a> ViewTextResolver<'a> {
	/// Creates a resolver for one pass over `map`, reading spans of
	/// `buffer`.
	pub fn new(map: &'a ProjectionMap, buffer: BufferId) -> Self {
		Self {
			map,
			buffer,
			cache: FxHashMap::default(),
		}
	}

	/// Returns the view span `original` occupies in `snapshot`.
	///
	/// The mapped start keeps [`Bias::Left`] and the mapped end
	/// [`Bias::Right`], so text typed at the end of the span is
	/// included. An end resolving before the start collapses to an
	/// empty span at the start.
	pub fn resolve_span(
		&self,
		original: SubjectSpan,
		snapshot: &ViewSnapshot,
	) -> Result<ViewSpan, ProjectionError> {
		let (start, end) = self.resolve_ends(original, snapshot, None)?;
		if end < start {
			warn!(?original, start = start.0, end = end.0, "tracked span resolved inverted");
			return Ok(ViewSpan::point(start));
		}
		Ok(ViewSpan::new(start, end))
	}

	/// Returns the live text of `original` in `snapshot`.
	///
	/// `end_override` substitutes the session's commit anchor for the
	/// span's own tracked end. An end resolving before the start is an
	/// anomaly: it degrades to the empty string rather than failing
	/// the session. Memoized by `original`; a pass uses one override
	/// policy throughout.
	pub fn resolve_text(
		&mut self,
		original: SubjectSpan,
		snapshot: &ViewSnapshot,
		end_override: Option<&TrackingPoint>,
	) -> Result<String, ProjectionError> {
		if let Some(text) = self.cache.get(&original) {
			return Ok(text.clone());
		}

		let (start, end) = self.resolve_ends(original, snapshot, end_override)?;
		let text = if end < start {
			warn!(?original, start = start.0, end = end.0, "tracked span resolved inverted");
			String::new()
		} else {
			snapshot.text_in(ViewSpan::new(start, end))
		};

		self.cache.insert(original, text.clone());
		Ok(text)
	}

	fn resolve_ends(
		&self,
		original: SubjectSpan,
		snapshot: &ViewSnapshot,
		end_override: Option<&TrackingPoint>,
	) -> Result<(ViewOffset, ViewOffset), ProjectionError> {
		let mapped = self.map.to_view(self.buffer, original)?;
		let version = self.map.view_version();

		let start = TrackingPoint::new(mapped.start, version, Bias::Left).position_in(snapshot);
		let end = match end_override {
			Some(point) => point.position_in(snapshot),
			None => TrackingPoint::new(mapped.end, version, Bias::Right).position_in(snapshot),
		};
		Ok((start, end))
	}
}
