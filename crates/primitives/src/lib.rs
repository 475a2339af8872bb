//! Text primitives for completion sessions: typed coordinate spaces,
//! edit deltas with biased position mapping, and the versioned view
//! buffer that tracking points resolve against.

/// Versioned view buffer, snapshots, and tracking points.
pub mod buffer;
/// Edit deltas with biased position mapping.
pub mod delta;
/// Typed offsets and spans for the subject and view coordinate spaces.
pub mod span;

pub use buffer::{BufferId, TrackingPoint, ViewBuffer, ViewSnapshot};
pub use delta::{Bias, Delta};
pub use span::{SubjectOffset, SubjectSpan, ViewOffset, ViewSpan};
