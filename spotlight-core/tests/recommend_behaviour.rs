//! Behavioural tests for the recommendation flow using rstest-bdd.

use std::cell::RefCell;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use spotlight_core::test_support::sample_catalog;
use spotlight_core::{
    Axis, CandidateItem, CandidateSource, ItemId, MemoryCatalog, MemoryProfileStore,
    PreferenceService, Recommendations, UserKey,
};

/// Shared state for recommendation scenarios.
struct RecommendWorld {
    service: PreferenceService<MemoryProfileStore>,
    user: UserKey,
    catalog: RefCell<MemoryCatalog>,
    rng: RefCell<ChaCha8Rng>,
    result: RefCell<Option<Recommendations>>,
}

impl RecommendWorld {
    fn new() -> Self {
        Self {
            service: PreferenceService::new(MemoryProfileStore::default()),
            user: UserKey::new("scenario-user").expect("valid key"),
            catalog: RefCell::new(MemoryCatalog::default()),
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(7)),
            result: RefCell::new(None),
        }
    }

    fn item(&self, id: ItemId) -> CandidateItem {
        self.catalog
            .borrow()
            .find(id)
            .expect("item should exist in the scenario catalog")
    }

    fn with_result<T>(&self, inspect: impl FnOnce(&Recommendations) -> T) -> T {
        let borrowed = self.result.borrow();
        let result = borrowed
            .as_ref()
            .expect("recommendations should be requested first");
        inspect(result)
    }
}

#[fixture]
fn world() -> RecommendWorld {
    RecommendWorld::new()
}

fn unquote(text: &str) -> &str {
    text.trim_matches('"')
}

#[given("a catalog with item 1 in Action and item 2 in Comedy")]
fn given_two_items(world: &RecommendWorld) {
    world.catalog.replace(MemoryCatalog::with_items([
        CandidateItem::new(1).with_category("Action"),
        CandidateItem::new(2).with_category("Comedy"),
    ]));
}

#[given("a catalog of Action items 1, 3 and 4")]
fn given_action_items(world: &RecommendWorld) {
    world.catalog.replace(MemoryCatalog::with_items(
        [1, 3, 4].map(|id| CandidateItem::new(id).with_category("Action")),
    ));
}

#[given("the sample catalog")]
fn given_sample_catalog(world: &RecommendWorld) {
    world.catalog.replace(sample_catalog());
}

#[when("the user views item {id}")]
fn when_view(world: &RecommendWorld, id: ItemId) {
    let outcome = world.service.record_view(&world.user, &world.item(id));
    assert!(outcome.is_clean());
}

#[when("the user books item {id}")]
fn when_book(world: &RecommendWorld, id: ItemId) {
    let outcome = world.service.record_booking(&world.user, &world.item(id));
    assert!(outcome.is_clean());
}

#[when("the user resets their preferences")]
fn when_reset(world: &RecommendWorld) {
    assert!(world.service.reset_preferences(&world.user).is_clean());
}

#[when("I request {count} recommendations")]
fn when_request(world: &RecommendWorld, count: usize) {
    let candidates: Vec<CandidateItem> = world.catalog.borrow().items().to_vec();
    let outcome = world.service.recommend(
        &world.user,
        &candidates,
        count,
        &mut *world.rng.borrow_mut(),
    );
    assert!(outcome.is_clean());
    world.result.replace(Some(outcome.into_value()));
}

#[then("the {label} category weight is {weight}")]
fn then_category_weight(world: &RecommendWorld, label: String, weight: f32) {
    let profile = world.service.profile(&world.user).into_value();
    assert!((profile.weight(Axis::Category, &label) - weight).abs() <= 1e-6);
    let stored = world
        .service
        .store()
        .stored(&world.user)
        .expect("profile should be written through");
    assert_eq!(stored, profile);
}

#[then("the most recently viewed item is {id}")]
fn then_most_recent(world: &RecommendWorld, id: ItemId) {
    let profile = world.service.profile(&world.user).into_value();
    assert_eq!(profile.recently_viewed().first(), Some(&id));
}

#[then("the recommended ids are {ids}")]
fn then_ids(world: &RecommendWorld, ids: String) {
    let expected: Vec<ItemId> = ids
        .split(',')
        .map(|raw| raw.trim().parse().expect("numeric id"))
        .collect();
    assert_eq!(world.with_result(Recommendations::item_ids), expected);
}

#[then("item {id} is explained as {text}")]
fn then_explained(world: &RecommendWorld, id: ItemId, text: String) {
    let rendered = world.with_result(|picks| picks.explanation(id).map(ToString::to_string));
    assert_eq!(rendered.as_deref(), Some(unquote(&text)));
}

#[then("item {id} scores {score}")]
fn then_scores(world: &RecommendWorld, id: ItemId, score: f32) {
    let found = world.with_result(|picks| {
        picks
            .entries()
            .iter()
            .find(|entry| entry.item.id == id)
            .map(|entry| entry.score)
    });
    let actual = found.expect("item should be recommended");
    assert!((actual - score).abs() <= 1e-6);
}

#[then("item {id} is not recommended")]
fn then_absent(world: &RecommendWorld, id: ItemId) {
    assert!(!world.with_result(|picks| picks.item_ids().contains(&id)));
}

#[then("the cold-start path was used")]
fn then_cold_start(world: &RecommendWorld) {
    assert!(world.with_result(Recommendations::is_cold_start));
}

#[then("{count} items are recommended")]
fn then_count(world: &RecommendWorld, count: usize) {
    assert_eq!(world.with_result(Recommendations::len), count);
}

#[then("every pick is explained as {text}")]
fn then_every_pick(world: &RecommendWorld, text: String) {
    let expected = unquote(&text).to_owned();
    world.with_result(|picks| {
        for id in picks.item_ids() {
            let rendered = picks.explanation(id).map(ToString::to_string);
            assert_eq!(rendered.as_ref(), Some(&expected));
        }
    });
}

#[scenario(path = "tests/features/recommend.feature", index = 0)]
fn viewed_item_hidden(world: RecommendWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommend.feature", index = 1)]
fn category_interest_cited(world: RecommendWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommend.feature", index = 2)]
fn reset_returns_to_cold_start(world: RecommendWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommend.feature", index = 3)]
fn new_user_small_catalog(world: RecommendWorld) {
    let _ = world;
}
