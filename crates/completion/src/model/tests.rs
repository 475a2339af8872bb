use std::sync::Arc;

use pretty_assertions::assert_eq;
use vellum_primitives::{SubjectOffset, ViewBuffer, ViewOffset};

use super::*;
use crate::filter::FilterId;
use crate::item::ItemId;

const SUBJECT: BufferId = BufferId(1);

fn default_span() -> SubjectSpan {
	SubjectSpan::new(SubjectOffset(8), SubjectOffset(10))
}

fn item(id: u32, text: &str) -> SharedItem {
	CompletionItem::new(ItemId(id), text, default_span()).shared()
}

fn item_with_filters(id: u32, text: &str, filters: &[u16]) -> SharedItem {
	let mut item = CompletionItem::new(ItemId(id), text, default_span());
	item.filters = filters.iter().map(|&f| FilterId(f)).collect();
	item.shared()
}

fn config() -> SessionConfig {
	SessionConfig {
		filters: vec![
			FilterDescriptor::new(FilterId(0), "fields"),
			FilterDescriptor::new(FilterId(1), "methods"),
			FilterDescriptor::new(FilterId(2), "properties"),
		],
		enrich_descriptions: false,
	}
}

fn params(items: Vec<SharedItem>) -> ModelParams {
	ModelParams {
		items,
		subject: SUBJECT,
		default_span: default_span(),
		trigger: CompletionTrigger::Insertion('F'),
		selected_item: None,
		hard_selection: false,
		is_unique: false,
		suggestion_mode: false,
		builder: None,
		dismiss_if_empty: false,
	}
}

fn view_fixture() -> ViewBuffer {
	ViewBuffer::from_text("let x = Fo")
}

fn build(
	params: ModelParams,
	config: &SessionConfig,
	describe: Option<&dyn DescriptionSource>,
) -> Arc<CompletionModel> {
	let buffer = view_fixture();
	let map = ProjectionMap::identity(SUBJECT, buffer.len(), buffer.version());
	CompletionModel::new(params, &map, &buffer.snapshot(), config, describe).unwrap()
}

fn model_with(items: Vec<SharedItem>) -> Arc<CompletionModel> {
	build(params(items), &config(), None)
}

fn ids(entries: &[SharedItem]) -> Vec<ItemId> {
	entries.iter().map(|entry| entry.id()).collect()
}

struct Enricher;

impl DescriptionSource for Enricher {
	fn describe(&self, entry: &dyn CompletionEntry) -> Option<String> {
		Some(format!("{} - member of Widget", entry.display_text()))
	}
}

#[test]
#[should_panic(expected = "no candidates")]
fn empty_candidate_set_panics() {
	model_with(Vec::new());
}

#[test]
fn default_builder_always_present() {
	let without = model_with(vec![item(1, "Foo")]);
	assert!(without.default_builder().is_builder());
	assert!(without.builder().is_none());

	let mut with = params(vec![item(1, "Foo")]);
	with.builder = Some(CompletionItem::builder(default_span()).shared());
	let with = build(with, &config(), None);
	assert!(with.default_builder().is_builder());
	assert!(with.builder().is_some());
}

#[test]
fn initial_snapshot_shows_everything() {
	let model = model_with(vec![item(1, "Foo"), item(2, "Bar"), item(3, "Baz")]);

	assert_eq!(ids(model.filtered_items()), ids(model.total_items()));
	assert!(model.filter_state().is_unfiltered());
	assert!(model.filter_text().is_empty());
	assert!(model.selected_item().is_none());
}

#[test]
fn displayed_filters_follow_master_order() {
	let model = model_with(vec![
		item_with_filters(1, "Foo", &[2]),
		item_with_filters(2, "Bar", &[0]),
	]);
	let names: Vec<_> = model.filters().iter().map(|f| f.name.as_str()).collect();
	assert_eq!(names, ["fields", "properties"]);
}

#[test]
fn displayed_filters_ignore_discovery_order() {
	let forward = model_with(vec![
		item_with_filters(1, "Foo", &[1]),
		item_with_filters(2, "Bar", &[0]),
	]);
	let reversed = model_with(vec![
		item_with_filters(2, "Bar", &[0]),
		item_with_filters(1, "Foo", &[1]),
	]);
	assert_eq!(forward.filters(), reversed.filters());
}

#[test]
fn with_selected_item_short_circuits_on_equal_value() {
	let model = model_with(vec![item(1, "Foo"), item(2, "Bar")]);
	let selected = model.with_selected_item(Some(item(1, "Foo")));
	assert!(!Arc::ptr_eq(&model, &selected));

	let again = selected.with_selected_item(Some(item(1, "Foo")));
	assert!(Arc::ptr_eq(&selected, &again));

	let cleared = selected.with_selected_item(None);
	assert!(cleared.selected_item().is_none());
	assert!(Arc::ptr_eq(&cleared, &cleared.with_selected_item(None)));
}

#[test]
fn with_filtered_items_rederives_selection() {
	let model = model_with(vec![item(1, "Foo"), item(2, "Bar"), item(3, "Baz")]);
	assert_eq!(model.filtered_items().len(), 3);

	let narrowed = model.with_filtered_items(vec![item(1, "Foo")]);
	assert_eq!(ids(narrowed.filtered_items()), [ItemId(1)]);
	assert_eq!(narrowed.selected_item().unwrap().display_text(), "Foo");

	let emptied = narrowed.with_filtered_items(Vec::new());
	assert!(emptied.selected_item().is_none());
	assert!(emptied.filtered_items().is_empty());

	// Total items survive narrowing untouched.
	assert_eq!(emptied.total_items().len(), 3);
}

#[test]
fn with_filtered_items_short_circuits_on_equal_list() {
	let model = model_with(vec![item(1, "Foo"), item(2, "Bar")]);
	let same = model.with_filtered_items(vec![item(1, "Foo"), item(2, "Bar")]);
	assert!(Arc::ptr_eq(&model, &same));
}

#[test]
fn bool_transitions_short_circuit() {
	let model = model_with(vec![item(1, "Foo")]);

	assert!(Arc::ptr_eq(&model, &model.with_hard_selection(false)));
	assert!(Arc::ptr_eq(&model, &model.with_is_unique(false)));
	assert!(Arc::ptr_eq(&model, &model.with_suggestion_mode(false)));

	let hard = model.with_hard_selection(true);
	assert!(hard.is_hard_selection());
	let unique = model.with_is_unique(true);
	assert!(unique.is_unique());
	let suggestion = model.with_suggestion_mode(true);
	assert!(suggestion.suggestion_mode());
}

#[test]
fn with_filter_state_replaces_and_short_circuits() {
	let model = model_with(vec![item(1, "Foo")]);

	let mut map = FilterTextMap::default();
	map.insert(ItemId(1), "Foo".to_string());
	let mut active = rustc_hash::FxHashMap::default();
	active.insert(FilterId(0), true);

	let filtered = model.with_filter_state(FilterState::FilteredBy(active.clone()));
	assert!(!filtered.filter_state().is_unfiltered());
	assert!(filtered.filter_state().is_active(FilterId(0)));
	assert!(!filtered.filter_state().is_active(FilterId(1)));

	let same = filtered.with_filter_state(FilterState::FilteredBy(active));
	assert!(Arc::ptr_eq(&filtered, &same));

	let texts = model.with_filter_text(map.clone());
	assert_eq!(texts.filter_text().get(&ItemId(1)).unwrap(), "Foo");
	assert!(Arc::ptr_eq(&texts, &texts.with_filter_text(map)));
}

#[test]
fn commit_anchor_follows_typing() {
	let mut buffer = view_fixture();
	let map = ProjectionMap::identity(SUBJECT, buffer.len(), buffer.version());
	let model = CompletionModel::new(params(vec![item(1, "Foo")]), &map, &buffer.snapshot(), &config(), None)
		.unwrap();

	assert_eq!(model.commit_anchor().offset(), ViewOffset(10));

	// Typing at the anchor extends the replacement region; typing
	// elsewhere leaves it alone.
	buffer.insert(ViewOffset(10), "o");
	assert_eq!(model.commit_anchor().position_in(&buffer.snapshot()), ViewOffset(11));

	buffer.insert(ViewOffset(0), "  ");
	assert_eq!(model.commit_anchor().position_in(&buffer.snapshot()), ViewOffset(13));
}

#[test]
fn with_commit_anchor_short_circuits() {
	let buffer = view_fixture();
	let model = model_with(vec![item(1, "Foo")]);

	let same = model.with_commit_anchor(model.commit_anchor());
	assert!(Arc::ptr_eq(&model, &same));

	let moved = model.with_commit_anchor(buffer.snapshot().anchor(ViewOffset(4), Bias::Right));
	assert!(!Arc::ptr_eq(&model, &moved));
	assert_eq!(moved.commit_anchor().offset(), ViewOffset(4));
}

#[test]
fn enrichment_wraps_entries_and_keeps_identity() {
	let mut config = config();
	config.enrich_descriptions = true;

	let mut params = params(vec![item(1, "Foo"), item(2, "Bar")]);
	params.selected_item = Some(item(2, "Bar"));
	let model = build(params, &config, Some(&Enricher));

	let selected = model.selected_item().unwrap();
	assert_eq!(selected.id(), ItemId(2));
	assert_eq!(selected.description(), "Bar - member of Widget");
	assert_eq!(model.total_items()[0].description(), "Foo - member of Widget");
	assert_eq!(model.default_builder().description(), " - member of Widget");
}

#[test]
fn snippet_trigger_bypasses_enrichment() {
	let mut config = config();
	config.enrich_descriptions = true;

	let mut params = params(vec![item(1, "Foo")]);
	params.trigger = CompletionTrigger::Snippet;
	let model = build(params, &config, Some(&Enricher));

	assert_eq!(model.total_items()[0].description(), "");
	assert!(model.trigger().wants_raw_display());
}

#[test]
fn disabled_enrichment_leaves_entries_alone() {
	let model = build(params(vec![item(1, "Foo")]), &config(), Some(&Enricher));
	assert_eq!(model.total_items()[0].description(), "");
}

#[test]
fn dismiss_if_empty_carries_through() {
	let mut params = params(vec![item(1, "Foo")]);
	params.dismiss_if_empty = true;
	let model = build(params, &config(), None);

	assert!(model.dismiss_if_empty());
	// Transitions keep the flag.
	assert!(model.with_filtered_items(Vec::new()).dismiss_if_empty());
}
