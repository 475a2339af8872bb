//! Subject-to-view span mapping.
//!
//! The view buffer may be a composition of several subject buffers
//! (embedded-language scenarios): each [`ProjectedRegion`] places one
//! contiguous run of a subject buffer at a fixed view offset. A
//! [`ProjectionMap`] is valid for exactly one (subject, view) version
//! pairing; callers rebuild it when either side advances.

use vellum_primitives::{BufferId, SubjectOffset, SubjectSpan, ViewOffset, ViewSpan};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProjectionError {
	#[error("buffer {0:?} is not part of this projection")]
	UnknownBuffer(BufferId),
	#[error("span {span:?} of buffer {buffer:?} is not projected into the view")]
	Unprojected { buffer: BufferId, span: SubjectSpan },
}

/// One contiguous run of a subject buffer placed into the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedRegion {
	/// The subject buffer this region comes from.
	pub source: BufferId,
	/// The run of the subject buffer that is visible.
	pub subject: SubjectSpan,
	/// Where the run starts in the view buffer.
	pub view_start: ViewOffset,
}

/// Maps subject-buffer spans into view-buffer spans.
#[derive(Debug, Clone)]
pub struct ProjectionMap {
	regions: Vec<ProjectedRegion>,
	subject_version: u64,
	view_version: u64,
}

impl ProjectionMap {
	/// Creates a map over the given regions, built against the given
	/// version pairing.
	pub fn new(regions: Vec<ProjectedRegion>, subject_version: u64, view_version: u64) -> Self {
		Self {
			regions,
			subject_version,
			view_version,
		}
	}

	/// The trivial map for an unlayered session: the whole subject
	/// buffer is the view, at identical offsets and versions.
	pub fn identity(buffer: BufferId, len: usize, version: u64) -> Self {
		let region = ProjectedRegion {
			source: buffer,
			subject: SubjectSpan::new(SubjectOffset(0), SubjectOffset(len)),
			view_start: ViewOffset(0),
		};
		Self::new(vec![region], version, version)
	}

	/// The subject-buffer version this map was built against.
	pub fn subject_version(&self) -> u64 {
		self.subject_version
	}

	/// The view-buffer version this map was built against.
	pub fn view_version(&self) -> u64 {
		self.view_version
	}

	/// Translates a subject span into view coordinates.
	///
	/// The span must lie wholly within a single projected region of
	/// `buffer`; a span straddling a region boundary has no contiguous
	/// image in the view.
	pub fn to_view(&self, buffer: BufferId, span: SubjectSpan) -> Result<ViewSpan, ProjectionError> {
		let mut saw_buffer = false;
		for region in &self.regions {
			if region.source != buffer {
				continue;
			}
			saw_buffer = true;
			if region.subject.contains_span(span) {
				let start = region.view_start.0 + (span.start.0 - region.subject.start.0);
				return Ok(ViewSpan::new(ViewOffset(start), ViewOffset(start + span.len())));
			}
		}

		if saw_buffer {
			Err(ProjectionError::Unprojected { buffer, span })
		} else {
			Err(ProjectionError::UnknownBuffer(buffer))
		}
	}
}
