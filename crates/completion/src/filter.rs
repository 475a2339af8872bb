//! Filter descriptors and the session's filter activation state.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::item::{CompletionEntry, ItemId, SharedItem};

/// Index of a filter in the session configuration's master list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterId(pub u16);

/// A named category the user can narrow the visible candidates by,
/// e.g. "fields" or "methods".
///
/// The master list fixes the ordering once per configuration; every
/// session displays its filters in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
	pub id: FilterId,
	pub name: String,
}

impl FilterDescriptor {
	pub fn new(id: FilterId, name: impl Into<String>) -> Self {
		Self {
			id,
			name: name.into(),
		}
	}
}

/// Activation state of the session's filters.
///
/// `Unfiltered` means no filter map has been applied yet. A map with
/// every value false is different: the user explicitly cleared each
/// filter, narrowing the list to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterState {
	Unfiltered,
	FilteredBy(FxHashMap<FilterId, bool>),
}

impl FilterState {
	/// Returns true if no filter map has been applied.
	pub fn is_unfiltered(&self) -> bool {
		matches!(self, FilterState::Unfiltered)
	}

	/// Returns whether entries matching `id` are visible.
	pub fn is_active(&self, id: FilterId) -> bool {
		match self {
			FilterState::Unfiltered => true,
			FilterState::FilteredBy(map) => map.get(&id).copied().unwrap_or(false),
		}
	}
}

/// Filter text per item, computed lazily and reused for incremental
/// narrowing.
pub type FilterTextMap = FxHashMap<ItemId, String>;

/// Computes the filters a session displays: those referenced by at
/// least one item, in master-list order.
///
/// The result depends only on the set of referenced ids, never on the
/// order candidates were discovered in.
pub fn displayed_filters(items: &[SharedItem], master: &[FilterDescriptor]) -> Vec<FilterDescriptor> {
	let referenced: FxHashSet<FilterId> = items
		.iter()
		.flat_map(|entry| entry.filters().iter().copied())
		.collect();

	master
		.iter()
		.filter(|descriptor| referenced.contains(&descriptor.id))
		.cloned()
		.collect()
}
