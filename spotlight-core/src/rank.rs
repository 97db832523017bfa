//! Order scored candidates into a top-k list.

use crate::{CandidateItem, Explanation, InterestProfile, Score, Scorer};

/// A candidate that survived ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// The recommended item.
    pub item: CandidateItem,
    /// Affinity score; never negative.
    pub score: f32,
    /// Why the item was picked, once explained.
    pub explanation: Option<Explanation>,
}

/// Rank `candidates` for `profile` and keep the best `k`.
///
/// Excluded candidates are dropped. The sort is stable, so candidates with
/// equal scores keep their input order.
///
/// # Examples
/// ```
/// use spotlight_core::{AffinityScorer, Axis, CandidateItem, InterestProfile, rank};
///
/// let profile = InterestProfile::new().with_weight(Axis::Type, "concert", 2.0);
/// let candidates = [
///     CandidateItem::new(1).with_type("movie"),
///     CandidateItem::new(2).with_type("concert"),
///     CandidateItem::new(3).with_type("theatre"),
/// ];
/// let ranked = rank(&candidates, &profile, &AffinityScorer, 2);
/// let ids: Vec<_> = ranked.iter().map(|entry| entry.item.id).collect();
/// assert_eq!(ids, vec![2, 1]);
/// ```
#[must_use]
pub fn rank<S>(
    candidates: &[CandidateItem],
    profile: &InterestProfile,
    scorer: &S,
    k: usize,
) -> Vec<ScoredCandidate>
where
    S: Scorer + ?Sized,
{
    if k == 0 {
        return Vec::new();
    }
    let mut scored: Vec<(&CandidateItem, f32)> = candidates
        .iter()
        .filter_map(|item| match scorer.score(item, profile) {
            Score::Scored(value) => Some((item, value)),
            Score::Excluded => None,
        })
        .collect();

    // `sort_by` is stable; `total_cmp` keeps the comparator a total order.
    scored.sort_by(|(_, lhs), (_, rhs)| rhs.total_cmp(lhs));
    scored.truncate(k);

    scored
        .into_iter()
        .map(|(item, score)| ScoredCandidate {
            item: item.clone(),
            score,
            explanation: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AffinityScorer, Axis};
    use rstest::rstest;

    fn ids(ranked: &[ScoredCandidate]) -> Vec<u64> {
        ranked.iter().map(|entry| entry.item.id).collect()
    }

    #[rstest]
    fn equal_scores_keep_input_order() {
        let candidates: Vec<_> = (1..=5)
            .map(|id| CandidateItem::new(id).with_category("Drama"))
            .collect();
        let profile = InterestProfile::new().with_weight(Axis::Category, "Drama", 1.0);
        let ranked = rank(&candidates, &profile, &AffinityScorer, 5);
        assert_eq!(ids(&ranked), vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn sorts_descending_then_truncates() {
        let candidates = [
            CandidateItem::new(1).with_location("Park"),
            CandidateItem::new(2).with_category("Action"),
            CandidateItem::new(3).with_type("movie"),
            CandidateItem::new(4),
        ];
        let profile = InterestProfile::new()
            .with_weight(Axis::Category, "Action", 1.0)
            .with_weight(Axis::Type, "movie", 1.0)
            .with_weight(Axis::Location, "Park", 1.0);
        let ranked = rank(&candidates, &profile, &AffinityScorer, 3);
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
        assert!(ranked.windows(2).all(|pair| match pair {
            [first, second] => first.score >= second.score,
            _ => true,
        }));
    }

    #[rstest]
    fn recently_viewed_never_ranked() {
        let candidates = [
            CandidateItem::new(1).with_category("Action"),
            CandidateItem::new(2).with_category("Comedy"),
        ];
        let mut profile = InterestProfile::new();
        profile.record_view(&candidates[0]);
        let ranked = rank(&candidates, &profile, &AffinityScorer, 2);
        assert_eq!(ids(&ranked), vec![2]);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(10, 3)]
    fn respects_k(#[case] k: usize, #[case] expected: usize) {
        let candidates: Vec<_> = (1..=3).map(CandidateItem::new).collect();
        let profile = InterestProfile::new().with_weight(Axis::Type, "movie", 1.0);
        assert_eq!(rank(&candidates, &profile, &AffinityScorer, k).len(), expected);
    }
}
