//! Completion entries: concrete candidates, the synthetic builder, and
//! the description-enriching wrapper.

use std::sync::Arc;

use smallvec::SmallVec;
use vellum_primitives::SubjectSpan;

use crate::filter::FilterId;

/// Identifies a completion item within one session.
///
/// Identity survives description enrichment: a wrapped entry reports
/// the id of the entry it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub u32);

impl ItemId {
	/// The id of the synthesized default builder.
	pub const DEFAULT_BUILDER: ItemId = ItemId(u32::MAX);
}

/// A shared, immutable completion entry.
pub type SharedItem = Arc<dyn CompletionEntry>;

/// Behavior common to discovered candidates and decorated wrappers.
pub trait CompletionEntry: Send + Sync {
	/// Session-scoped identity.
	fn id(&self) -> ItemId;

	/// The text shown in the completion list.
	fn display_text(&self) -> &str;

	/// The subject-buffer span this entry replaces on commit.
	fn span(&self) -> SubjectSpan;

	/// The filter categories this entry matches.
	fn filters(&self) -> &[FilterId];

	/// True for the synthetic entry standing in for freely-typed text.
	fn is_builder(&self) -> bool;

	/// Descriptive text shown alongside the entry.
	fn description(&self) -> String;
}

/// A concrete completion candidate as supplied by the item provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
	pub id: ItemId,
	pub display_text: String,
	pub span: SubjectSpan,
	pub filters: SmallVec<[FilterId; 4]>,
	pub is_builder: bool,
	pub description: String,
}

impl CompletionItem {
	/// Creates a plain candidate with no filters and no description.
	pub fn new(id: ItemId, display_text: impl Into<String>, span: SubjectSpan) -> Self {
		Self {
			id,
			display_text: display_text.into(),
			span,
			filters: SmallVec::new(),
			is_builder: false,
			description: String::new(),
		}
	}

	/// Synthesizes the builder entry standing in for the user's typed
	/// text over `span`.
	pub fn builder(span: SubjectSpan) -> Self {
		Self {
			id: ItemId::DEFAULT_BUILDER,
			display_text: String::new(),
			span,
			filters: SmallVec::new(),
			is_builder: true,
			description: String::new(),
		}
	}

	/// Wraps the item for sharing across snapshots.
	pub fn shared(self) -> SharedItem {
		Arc::new(self)
	}
}

impl CompletionEntry for CompletionItem {
	fn id(&self) -> ItemId {
		self.id
	}

	fn display_text(&self) -> &str {
		&self.display_text
	}

	fn span(&self) -> SubjectSpan {
		self.span
	}

	fn filters(&self) -> &[FilterId] {
		&self.filters
	}

	fn is_builder(&self) -> bool {
		self.is_builder
	}

	fn description(&self) -> String {
		self.description.clone()
	}
}

/// Supplies enriched descriptive text for entries.
///
/// Consulted once per entry at session construction; an entry the
/// source cannot describe keeps its own description.
pub trait DescriptionSource {
	fn describe(&self, entry: &dyn CompletionEntry) -> Option<String>;
}

/// Wraps an entry to replace its descriptive text, deferring
/// everything else to the wrapped entry.
pub struct DescribedItem {
	inner: SharedItem,
	description: String,
}

impl DescribedItem {
	/// Wraps `inner` with the text `source` supplies for it, or
	/// returns it unchanged when the source has nothing to say.
	pub fn wrap(inner: SharedItem, source: &dyn DescriptionSource) -> SharedItem {
		match source.describe(inner.as_ref()) {
			Some(description) => Arc::new(Self { inner, description }),
			None => inner,
		}
	}
}

impl CompletionEntry for DescribedItem {
	fn id(&self) -> ItemId {
		self.inner.id()
	}

	fn display_text(&self) -> &str {
		self.inner.display_text()
	}

	fn span(&self) -> SubjectSpan {
		self.inner.span()
	}

	fn filters(&self) -> &[FilterId] {
		self.inner.filters()
	}

	fn is_builder(&self) -> bool {
		self.inner.is_builder()
	}

	fn description(&self) -> String {
		self.description.clone()
	}
}
