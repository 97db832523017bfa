//! Facade crate for the Spotlight recommendation engine.
//!
//! This crate re-exports the core domain types and exposes the durable
//! profile stores behind feature flags.
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use spotlight::{CandidateItem, MemoryProfileStore, PreferenceService, UserKey};
//!
//! let service = PreferenceService::new(MemoryProfileStore::default());
//! let user = UserKey::new("robin")?;
//! let catalog = [
//!     CandidateItem::new(1).with_category("Jazz"),
//!     CandidateItem::new(2).with_category("Jazz"),
//! ];
//!
//! assert!(service.record_view(&user, &catalog[0]).is_clean());
//! let picks = service
//!     .recommend(&user, &catalog, 4, &mut StdRng::seed_from_u64(1))
//!     .into_value();
//! assert_eq!(picks.item_ids(), vec![2]);
//! # Ok::<(), spotlight::UserKeyError>(())
//! ```

#![forbid(unsafe_code)]

pub use spotlight_core::{
    Axis, CandidateFilter, CandidateItem, CandidateSource, ColdStartStrategy, Explainer,
    Explanation, FEATURED_DETAIL, InterestProfile, ItemId, MemoryCatalog, MemoryProfileStore,
    MemoryStoreError, Outcome, PreferenceService, ProfileStore, RecommendationEngine,
    RecommendationPath, Recommendations, RecomputeQueue, RecomputeTicket, RecomputeWorker,
    Recomputed, Score, ScoredCandidate, Scorer, ServiceWarning, Signal, UserKey, UserKeyError,
    WorkerConfig, rank,
};

#[cfg(feature = "store-json")]
pub use spotlight_store::{JsonProfileStore, JsonStoreError};

#[cfg(feature = "store-sqlite")]
pub use spotlight_store::{SqliteProfileStore, SqliteStoreError};
