//! Property-based tests for ranking and cold start.
//!
//! # Invariants tested
//!
//! - **Exclusion:** recently viewed items never appear in ranked output.
//! - **Bounds:** ranking returns at most `k` items.
//! - **Ordering:** scores are non-increasing; ties keep input order.
//! - **Cold start:** a blank profile yields `min(k, n)` distinct candidates.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use spotlight_core::test_support::TableScorer;
use spotlight_core::{
    AffinityScorer, CandidateItem, Explanation, InterestProfile, RecommendationEngine, Score,
    rank,
};

const CATEGORIES: [&str; 4] = ["Action", "Music", "Sports", "Comedy"];
const TYPES: [&str; 3] = ["movie", "concert", "play"];
const LOCATIONS: [&str; 3] = ["Odeon", "Harbour Hall", "City Park"];

fn label(options: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(options).prop_map(str::to_owned))
}

fn catalog_strategy(max: usize) -> impl Strategy<Value = Vec<CandidateItem>> {
    prop::collection::vec(
        (label(&CATEGORIES), label(&TYPES), label(&LOCATIONS)),
        0..max,
    )
    .prop_map(|descriptors| {
        descriptors
            .into_iter()
            .zip(1_u64..)
            .map(|((category, item_type, location), id)| CandidateItem {
                category,
                item_type,
                location,
                ..CandidateItem::new(id)
            })
            .collect()
    })
}

fn profile_from(catalog: &[CandidateItem], views: &[usize], bookings: &[usize]) -> InterestProfile {
    let mut profile = InterestProfile::new();
    for index in views {
        if let Some(item) = catalog.get(*index) {
            profile.record_view(item);
        }
    }
    for index in bookings {
        if let Some(item) = catalog.get(*index) {
            profile.record_booking(item);
        }
    }
    profile
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn recently_viewed_never_ranked(
        catalog in catalog_strategy(24),
        views in prop::collection::vec(0_usize..24, 0..16),
        bookings in prop::collection::vec(0_usize..24, 0..4),
        k in 0_usize..30,
    ) {
        let profile = profile_from(&catalog, &views, &bookings);
        let ranked = rank(&catalog, &profile, &AffinityScorer, k);
        for entry in &ranked {
            prop_assert!(!profile.has_recently_viewed(entry.item.id));
        }
    }

    #[test]
    fn ranking_is_bounded_and_descending(
        catalog in catalog_strategy(24),
        bookings in prop::collection::vec(0_usize..24, 1..6),
        k in 0_usize..30,
    ) {
        let profile = profile_from(&catalog, &[], &bookings);
        let ranked = rank(&catalog, &profile, &AffinityScorer, k);
        prop_assert!(ranked.len() <= k);
        prop_assert!(ranked.len() <= catalog.len());
        for pair in ranked.windows(2) {
            if let [first, second] = pair {
                prop_assert!(first.score >= second.score);
            }
        }
    }

    #[test]
    fn ties_keep_input_order(
        scores in prop::collection::vec(prop::sample::select(&[0.0_f32, 1.0, 2.0][..]), 0..20),
    ) {
        let catalog: Vec<CandidateItem> = (1..=scores.len() as u64).map(CandidateItem::new).collect();
        let scorer = TableScorer::with_scores(
            catalog.iter().map(|item| item.id).zip(scores.iter().map(|s| Score::Scored(*s))),
        );
        let ranked = rank(&catalog, &InterestProfile::new(), &scorer, catalog.len());
        for pair in ranked.windows(2) {
            if let [first, second] = pair {
                if (first.score - second.score).abs() <= f32::EPSILON {
                    prop_assert!(first.item.id < second.item.id);
                }
            }
        }
    }

    #[test]
    fn excluded_scores_are_dropped(
        excluded in prop::collection::vec(any::<bool>(), 0..20),
    ) {
        let catalog: Vec<CandidateItem> =
            (1..=excluded.len() as u64).map(CandidateItem::new).collect();
        let scorer = TableScorer::with_scores(catalog.iter().zip(&excluded).map(|(item, drop)| {
            (item.id, if *drop { Score::Excluded } else { Score::Scored(1.0) })
        }));
        let ranked = rank(&catalog, &InterestProfile::new(), &scorer, catalog.len());
        let kept = excluded.iter().filter(|drop| !**drop).count();
        prop_assert_eq!(ranked.len(), kept);
    }

    #[test]
    fn cold_start_returns_distinct_members(
        catalog in catalog_strategy(20),
        k in 0_usize..25,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let picks = <RecommendationEngine>::default().recommend(
            &InterestProfile::new(),
            &catalog,
            k,
            &mut rng,
        );
        prop_assert!(picks.is_cold_start());
        prop_assert_eq!(picks.len(), k.min(catalog.len()));
        let ids: HashSet<u64> = picks.item_ids().into_iter().collect();
        prop_assert_eq!(ids.len(), picks.len());
        prop_assert!(picks.explanations().values().all(|reason| *reason == Explanation::Trending));
    }
}
