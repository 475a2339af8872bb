//! The immutable completion-session snapshot and its transitions.

use std::sync::Arc;

use tracing::debug;
use vellum_primitives::{Bias, BufferId, SubjectSpan, TrackingPoint, ViewSnapshot};
use vellum_projection::{ProjectionError, ProjectionMap};

use crate::filter::{FilterDescriptor, FilterState, FilterTextMap, displayed_filters};
use crate::item::{CompletionEntry, CompletionItem, DescribedItem, DescriptionSource, SharedItem};

/// Why a completion session started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTrigger {
	/// Explicit user invocation.
	Invoked,
	/// A typed character opened or narrowed the session.
	Insertion(char),
	/// Backspace or delete re-opened the session.
	Deletion,
	/// Snippet-shortcut expansion; entries show their raw text.
	Snippet,
}

impl CompletionTrigger {
	/// True when the trigger asks for raw display, bypassing
	/// description enrichment.
	pub fn wants_raw_display(self) -> bool {
		matches!(self, CompletionTrigger::Snippet)
	}
}

/// Session configuration, resolved once by the caller and passed into
/// construction.
#[derive(Debug, Clone)]
pub struct SessionConfig {
	/// Master filter list; its ordering is shared across sessions.
	pub filters: Vec<FilterDescriptor>,
	/// Whether entries get description enrichment at construction.
	pub enrich_descriptions: bool,
}

/// Everything the item provider hands over to start a session.
pub struct ModelParams {
	/// The initial candidate set. Must not be empty.
	pub items: Vec<SharedItem>,
	/// The subject buffer the candidates were discovered in.
	pub subject: BufferId,
	/// Replacement span in subject coordinates; also seeds the default
	/// builder.
	pub default_span: SubjectSpan,
	pub trigger: CompletionTrigger,
	/// The provider's initial best guess, if any.
	pub selected_item: Option<SharedItem>,
	pub hard_selection: bool,
	pub is_unique: bool,
	pub suggestion_mode: bool,
	/// Provider-supplied builder; the model synthesizes a default one
	/// regardless.
	pub builder: Option<SharedItem>,
	/// Tear the session down when filtering removes every item.
	pub dismiss_if_empty: bool,
}

/// One immutable snapshot of an in-progress completion session.
///
/// Every user-visible change derives a new snapshot through a `with_*`
/// transition; a transition handed a value equal to the current one
/// returns the same `Arc`, which consumers rely on to skip
/// re-rendering (`Arc::ptr_eq`). Unchanged fields are shared between
/// snapshots, never deep-copied.
///
/// The model never mutates after construction, so readers may keep any
/// snapshot while the next one is being computed. It does not verify
/// that the selected item belongs to the filtered set; transition
/// callers maintain that convention.
#[derive(Clone)]
pub struct CompletionModel {
	total_items: Arc<Vec<SharedItem>>,
	filtered_items: Arc<Vec<SharedItem>>,
	filters: Arc<Vec<FilterDescriptor>>,
	filter_state: FilterState,
	filter_text: Arc<FilterTextMap>,
	selected_item: Option<SharedItem>,
	hard_selection: bool,
	is_unique: bool,
	suggestion_mode: bool,
	builder: Option<SharedItem>,
	default_builder: SharedItem,
	trigger: CompletionTrigger,
	commit_anchor: TrackingPoint,
	dismiss_if_empty: bool,
}

impl CompletionModel {
	/// Builds the initial snapshot of a session.
	///
	/// The commit anchor is placed at the end of the default span's
	/// view image with [`Bias::Right`], so keystrokes at the boundary
	/// extend the replacement region. When `config` enables enrichment
	/// and the trigger does not ask for raw display, every entry is
	/// wrapped through `describe`; the pre-selected item is
	/// re-associated with its wrapped counterpart by id.
	///
	/// Fails only if the default span has no image in the view.
	///
	/// # Panics
	///
	/// Panics if `params.items` is empty. Providers must never start a
	/// session without candidates.
	pub fn new(
		params: ModelParams,
		map: &ProjectionMap,
		view: &ViewSnapshot,
		config: &SessionConfig,
		describe: Option<&dyn DescriptionSource>,
	) -> Result<Arc<Self>, ProjectionError> {
		let ModelParams {
			items,
			subject,
			default_span,
			trigger,
			selected_item,
			hard_selection,
			is_unique,
			suggestion_mode,
			builder,
			dismiss_if_empty,
		} = params;

		assert!(!items.is_empty(), "completion session started with no candidates");

		let default_builder: SharedItem = CompletionItem::builder(default_span).shared();
		let filters = displayed_filters(&items, &config.filters);

		let enrich = config.enrich_descriptions && !trigger.wants_raw_display();
		let (items, builder, default_builder, selected_item) = match describe {
			Some(source) if enrich => {
				let items: Vec<SharedItem> = items
					.into_iter()
					.map(|entry| DescribedItem::wrap(entry, source))
					.collect();
				let builder = builder.map(|entry| DescribedItem::wrap(entry, source));
				let default_builder = DescribedItem::wrap(default_builder, source);
				let selected_item = selected_item.map(|selected| {
					items
						.iter()
						.find(|entry| entry.id() == selected.id())
						.cloned()
						.unwrap_or(selected)
				});
				(items, builder, default_builder, selected_item)
			}
			_ => (items, builder, default_builder, selected_item),
		};

		let view_span = map.to_view(subject, default_span)?;
		let commit_anchor = view.anchor(view_span.end, Bias::Right);

		debug!(
			items = items.len(),
			filters = filters.len(),
			?trigger,
			"completion session started"
		);

		let total_items = Arc::new(items);
		Ok(Arc::new(Self {
			filtered_items: total_items.clone(),
			total_items,
			filters: Arc::new(filters),
			filter_state: FilterState::Unfiltered,
			filter_text: Arc::new(FilterTextMap::default()),
			selected_item,
			hard_selection,
			is_unique,
			suggestion_mode,
			builder,
			default_builder,
			trigger,
			commit_anchor,
			dismiss_if_empty,
		}))
	}

	/// Every candidate of the session.
	pub fn total_items(&self) -> &[SharedItem] {
		&self.total_items
	}

	/// The subset currently visible after narrowing.
	pub fn filtered_items(&self) -> &[SharedItem] {
		&self.filtered_items
	}

	/// The filter buttons this session displays, in master order.
	pub fn filters(&self) -> &[FilterDescriptor] {
		&self.filters
	}

	/// The filter activation state.
	pub fn filter_state(&self) -> &FilterState {
		&self.filter_state
	}

	/// The per-item filter text cache.
	pub fn filter_text(&self) -> &FilterTextMap {
		&self.filter_text
	}

	/// The currently selected entry, if any.
	pub fn selected_item(&self) -> Option<&SharedItem> {
		self.selected_item.as_ref()
	}

	/// True when the user explicitly chose the selection; false for a
	/// best-guess default.
	pub fn is_hard_selection(&self) -> bool {
		self.hard_selection
	}

	/// True when exactly one item remains after filtering.
	pub fn is_unique(&self) -> bool {
		self.is_unique
	}

	/// Display-style hint for suggestion mode.
	pub fn suggestion_mode(&self) -> bool {
		self.suggestion_mode
	}

	/// The provider-supplied builder, if any.
	pub fn builder(&self) -> Option<&SharedItem> {
		self.builder.as_ref()
	}

	/// The synthesized builder; present in every session.
	pub fn default_builder(&self) -> &SharedItem {
		&self.default_builder
	}

	/// Why the session started.
	pub fn trigger(&self) -> CompletionTrigger {
		self.trigger
	}

	/// The end of the text that will be replaced on commit.
	pub fn commit_anchor(&self) -> TrackingPoint {
		self.commit_anchor
	}

	/// Whether the session should be torn down when filtering removes
	/// every item.
	pub fn dismiss_if_empty(&self) -> bool {
		self.dismiss_if_empty
	}

	/// Replaces the visible subset and re-derives the selection from
	/// its first element (absent when the subset is empty).
	pub fn with_filtered_items(self: &Arc<Self>, filtered: Vec<SharedItem>) -> Arc<Self> {
		if entries_eq(&self.filtered_items, &filtered) {
			return self.clone();
		}
		let selected_item = filtered.first().cloned();
		Arc::new(Self {
			filtered_items: Arc::new(filtered),
			selected_item,
			..(**self).clone()
		})
	}

	/// Replaces the selected entry.
	pub fn with_selected_item(self: &Arc<Self>, selected: Option<SharedItem>) -> Arc<Self> {
		if opt_entry_eq(&self.selected_item, &selected) {
			return self.clone();
		}
		Arc::new(Self {
			selected_item: selected,
			..(**self).clone()
		})
	}

	/// Replaces the hard-selection flag.
	pub fn with_hard_selection(self: &Arc<Self>, hard_selection: bool) -> Arc<Self> {
		if self.hard_selection == hard_selection {
			return self.clone();
		}
		Arc::new(Self {
			hard_selection,
			..(**self).clone()
		})
	}

	/// Replaces the uniqueness flag.
	pub fn with_is_unique(self: &Arc<Self>, is_unique: bool) -> Arc<Self> {
		if self.is_unique == is_unique {
			return self.clone();
		}
		Arc::new(Self {
			is_unique,
			..(**self).clone()
		})
	}

	/// Replaces the provider-supplied builder.
	pub fn with_builder(self: &Arc<Self>, builder: Option<SharedItem>) -> Arc<Self> {
		if opt_entry_eq(&self.builder, &builder) {
			return self.clone();
		}
		Arc::new(Self {
			builder,
			..(**self).clone()
		})
	}

	/// Replaces the suggestion-mode hint.
	pub fn with_suggestion_mode(self: &Arc<Self>, suggestion_mode: bool) -> Arc<Self> {
		if self.suggestion_mode == suggestion_mode {
			return self.clone();
		}
		Arc::new(Self {
			suggestion_mode,
			..(**self).clone()
		})
	}

	/// Replaces the commit anchor.
	pub fn with_commit_anchor(self: &Arc<Self>, commit_anchor: TrackingPoint) -> Arc<Self> {
		if self.commit_anchor == commit_anchor {
			return self.clone();
		}
		Arc::new(Self {
			commit_anchor,
			..(**self).clone()
		})
	}

	/// Replaces the filter activation state.
	pub fn with_filter_state(self: &Arc<Self>, filter_state: FilterState) -> Arc<Self> {
		if self.filter_state == filter_state {
			return self.clone();
		}
		Arc::new(Self {
			filter_state,
			..(**self).clone()
		})
	}

	/// Replaces the per-item filter text cache.
	pub fn with_filter_text(self: &Arc<Self>, filter_text: FilterTextMap) -> Arc<Self> {
		if *self.filter_text == filter_text {
			return self.clone();
		}
		Arc::new(Self {
			filter_text: Arc::new(filter_text),
			..(**self).clone()
		})
	}
}

/// Entry equality for transition short-circuits: by id.
fn entry_eq(a: &SharedItem, b: &SharedItem) -> bool {
	a.id() == b.id()
}

fn entries_eq(a: &[SharedItem], b: &[SharedItem]) -> bool {
	a.len() == b.len() && a.iter().zip(b).all(|(a, b)| entry_eq(a, b))
}

fn opt_entry_eq(a: &Option<SharedItem>, b: &Option<SharedItem>) -> bool {
	match (a, b) {
		(None, None) => true,
		(Some(a), Some(b)) => entry_eq(a, b),
		_ => false,
	}
}

#[cfg(test)]
mod tests;
