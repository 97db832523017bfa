//! The recommendation facade combining scoring, ranking, explanations and
//! the cold-start fallback.

use std::collections::BTreeMap;

use rand::Rng;

use crate::{
    AffinityScorer, CandidateItem, ColdStartStrategy, Explainer, Explanation, InterestProfile,
    ItemId, ScoredCandidate, Scorer, ThresholdExplainer, UniformColdStart, rank,
};

/// Number of recommendations shown when the caller does not choose.
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 4;

/// Which strategy produced a set of recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RecommendationPath {
    /// The profile was blank; items were drawn at random.
    ColdStart,
    /// Items were scored against the profile.
    Personalised,
}

/// Ordered recommendations with one explanation per item.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    path: RecommendationPath,
    entries: Vec<ScoredCandidate>,
}

impl Recommendations {
    /// Strategy that produced these recommendations.
    #[must_use]
    pub const fn path(&self) -> RecommendationPath {
        self.path
    }

    /// Report whether the cold-start fallback was used.
    #[must_use]
    pub const fn is_cold_start(&self) -> bool {
        matches!(self.path, RecommendationPath::ColdStart)
    }

    /// Ranked entries, best first.
    #[must_use]
    pub const fn entries(&self) -> &[ScoredCandidate] {
        self.entries.as_slice()
    }

    /// Recommended items, best first.
    pub fn items(&self) -> impl Iterator<Item = &CandidateItem> {
        self.entries.iter().map(|entry| &entry.item)
    }

    /// Recommended item ids, best first.
    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items().map(|item| item.id).collect()
    }

    /// Explanation for a recommended item.
    #[must_use]
    pub fn explanation(&self, id: ItemId) -> Option<&Explanation> {
        self.entries
            .iter()
            .find(|entry| entry.item.id == id)
            .and_then(|entry| entry.explanation.as_ref())
    }

    /// Explanations keyed by item id.
    #[must_use]
    pub fn explanations(&self) -> BTreeMap<ItemId, Explanation> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .explanation
                    .clone()
                    .map(|explanation| (entry.item.id, explanation))
            })
            .collect()
    }

    /// Number of recommended items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether nothing was recommended.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into the ordered items and their explanations.
    #[must_use]
    pub fn into_parts(self) -> (Vec<CandidateItem>, BTreeMap<ItemId, Explanation>) {
        let explanations = self.explanations();
        let items = self.entries.into_iter().map(|entry| entry.item).collect();
        (items, explanations)
    }
}

/// Compose cold start, scoring, ranking and explanations.
///
/// The engine holds no mutable state; [`RecommendationEngine::recommend`]
/// depends only on its arguments, so one engine can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine<
    S = AffinityScorer,
    E = ThresholdExplainer,
    C = UniformColdStart,
> {
    scorer: S,
    explainer: E,
    cold_start: C,
}

impl<S, E, C> RecommendationEngine<S, E, C>
where
    S: Scorer,
    E: Explainer,
    C: ColdStartStrategy,
{
    /// Build an engine from its collaborators.
    #[must_use]
    pub const fn new(scorer: S, explainer: E, cold_start: C) -> Self {
        Self {
            scorer,
            explainer,
            cold_start,
        }
    }

    /// Recommend up to `k` of `candidates` for `profile`.
    ///
    /// A blank profile takes the cold-start path and `rng` decides the
    /// picks. Any other profile is scored, ranked and explained; `rng` is
    /// then unused.
    pub fn recommend<R>(
        &self,
        profile: &InterestProfile,
        candidates: &[CandidateItem],
        k: usize,
        rng: &mut R,
    ) -> Recommendations
    where
        R: Rng + ?Sized,
    {
        if profile.is_blank() {
            log::debug!(
                "blank profile; choosing {k} of {} candidates at random",
                candidates.len()
            );
            return Recommendations {
                path: RecommendationPath::ColdStart,
                entries: self.cold_start.select(candidates, k, rng),
            };
        }

        let entries = rank(candidates, profile, &self.scorer, k)
            .into_iter()
            .map(|mut entry| {
                entry.explanation = Some(self.explainer.explain(&entry.item, profile));
                entry
            })
            .collect();
        Recommendations {
            path: RecommendationPath::Personalised,
            entries,
        }
    }
}
