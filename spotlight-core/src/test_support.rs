//! Fixtures shared by unit and behaviour tests.
//!
//! Compiled for this crate's own tests and behind the `test-support`
//! feature for everything else.

use std::collections::HashMap;

use crate::{CandidateItem, InterestProfile, ItemId, MemoryCatalog, Score, Scorer};

/// Build an item described on every axis.
#[must_use]
pub fn item(id: ItemId, category: &str, item_type: &str, location: &str) -> CandidateItem {
    CandidateItem::new(id)
        .with_category(category)
        .with_type(item_type)
        .with_location(location)
}

/// Small event catalog spanning several categories and venues.
#[must_use]
pub fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::with_items([
        item(1, "Action", "movie", "Riverside Cinema").with_detail("title", "Last Stand"),
        item(2, "Music", "concert", "Harbour Hall").with_detail("title", "Winter Strings"),
        item(3, "Theater", "play", "Old Vic").with_detail("title", "The Glass Garden"),
        item(4, "Sports", "sports", "Central Arena").with_detail("title", "Cup Final"),
        item(5, "Comedy", "comedy", "Basement Club").with_detail("title", "Open Mic Night"),
        item(6, "Sci-Fi", "movie", "Riverside Cinema").with_detail("title", "Red Horizon"),
        item(7, "Music", "festival", "City Park").with_detail("title", "Summer Sound"),
        item(8, "Action", "movie", "Odeon").with_detail("title", "Night Chase"),
    ])
}

/// `Scorer` returning a fixed score per item id; unknown ids score zero.
#[derive(Debug, Clone, Default)]
pub struct TableScorer {
    scores: HashMap<ItemId, Score>,
}

impl TableScorer {
    /// Create a scorer from `(id, score)` pairs.
    #[must_use]
    pub fn with_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (ItemId, Score)>,
    {
        Self {
            scores: scores.into_iter().collect(),
        }
    }
}

impl Scorer for TableScorer {
    fn score(&self, item: &CandidateItem, _profile: &InterestProfile) -> Score {
        self.scores
            .get(&item.id)
            .copied()
            .unwrap_or(Score::Scored(0.0))
    }
}
