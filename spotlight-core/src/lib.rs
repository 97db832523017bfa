//! Core domain types for the Spotlight recommendation engine.
//!
//! The crate tracks implicit interest signals (views and bookings) in an
//! [`InterestProfile`], scores catalog items against that profile with a
//! fixed linear heuristic, and explains each pick in plain language. Every
//! scoring step is a pure function of its inputs; the only shared mutable
//! state lives in [`PreferenceService`], which owns one profile per user and
//! writes every change through to an injected [`ProfileStore`].
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use spotlight_core::{CandidateItem, Explanation, InterestProfile, RecommendationEngine};
//!
//! let candidates = vec![
//!     CandidateItem::new(1).with_category("Action"),
//!     CandidateItem::new(2).with_category("Comedy"),
//! ];
//! let mut profile = InterestProfile::new();
//! profile.record_view(&candidates[0]);
//!
//! let engine: RecommendationEngine = RecommendationEngine::default();
//! let mut rng = StdRng::seed_from_u64(7);
//! let picks = engine.recommend(&profile, &candidates, 2, &mut rng);
//!
//! assert_eq!(picks.item_ids(), vec![2]);
//! assert_eq!(picks.explanation(2), Some(&Explanation::ForYou));
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod axis;
pub mod catalog;
pub mod cold_start;
pub mod engine;
pub mod explain;
pub mod item;
pub mod profile;
pub mod rank;
pub mod recompute;
pub mod scorer;
pub mod service;
pub mod signal;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod user;

pub use axis::Axis;
pub use catalog::{CandidateFilter, CandidateSource, FEATURED_DETAIL, MemoryCatalog};
pub use cold_start::{ColdStartStrategy, UniformColdStart};
pub use engine::{
    DEFAULT_RECOMMENDATION_COUNT, RecommendationEngine, RecommendationPath, Recommendations,
};
pub use explain::{Explainer, Explanation, STRONG_INTEREST_FLOOR, ThresholdExplainer};
pub use item::{CandidateItem, Details, ItemId};
pub use profile::{InterestProfile, RECENTLY_VIEWED_CAP, Weights};
pub use rank::{ScoredCandidate, rank};
pub use recompute::{
    DEFAULT_DEBOUNCE, RecomputeQueue, RecomputeTicket, RecomputeWorker, Recomputed, WorkerConfig,
};
pub use scorer::{
    AffinityScorer, CATEGORY_COEFFICIENT, EXCLUDED_SCORE, LOCATION_COEFFICIENT, Score, Scorer,
    TYPE_COEFFICIENT,
};
pub use service::{Outcome, PreferenceService, ServiceWarning};
pub use signal::Signal;
pub use store::{MemoryProfileStore, MemoryStoreError, ProfileStore};
pub use user::{UserKey, UserKeyError};
