//! Fallback picks for users without any recorded signal.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{CandidateItem, Explanation, ScoredCandidate};

/// Produce recommendations without consulting a profile.
pub trait ColdStartStrategy: Send + Sync {
    /// Choose up to `k` entries from `candidates` using `rng`.
    fn select<R>(&self, candidates: &[CandidateItem], k: usize, rng: &mut R) -> Vec<ScoredCandidate>
    where
        R: Rng + ?Sized;
}

/// Uniformly shuffle the candidate set and keep the first `k` items.
///
/// Nothing is excluded and every pick carries the same generic
/// explanation.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use spotlight_core::{CandidateItem, ColdStartStrategy, Explanation, UniformColdStart};
///
/// let candidates: Vec<_> = (1..=6).map(CandidateItem::new).collect();
/// let mut rng = StdRng::seed_from_u64(3);
/// let picks = UniformColdStart::default().select(&candidates, 4, &mut rng);
/// assert_eq!(picks.len(), 4);
/// assert!(picks.iter().all(|p| p.explanation == Some(Explanation::Trending)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformColdStart {
    explanation: Explanation,
}

impl UniformColdStart {
    /// Tag every pick with `explanation` instead of [`Explanation::Trending`].
    #[must_use]
    pub const fn with_explanation(explanation: Explanation) -> Self {
        Self { explanation }
    }
}

impl Default for UniformColdStart {
    fn default() -> Self {
        Self::with_explanation(Explanation::Trending)
    }
}

impl ColdStartStrategy for UniformColdStart {
    fn select<R>(&self, candidates: &[CandidateItem], k: usize, rng: &mut R) -> Vec<ScoredCandidate>
    where
        R: Rng + ?Sized,
    {
        let mut pool: Vec<&CandidateItem> = candidates.iter().collect();
        let amount = k.min(pool.len());
        let (picked, _) = pool.partial_shuffle(rng, amount);
        picked
            .iter()
            .map(|item| ScoredCandidate {
                item: (*item).clone(),
                score: 0.0,
                explanation: Some(self.explanation.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;
    use std::collections::HashSet;

    fn catalog(count: u64) -> Vec<CandidateItem> {
        (1..=count).map(CandidateItem::new).collect()
    }

    fn ids(picks: &[ScoredCandidate]) -> Vec<u64> {
        picks.iter().map(|pick| pick.item.id).collect()
    }

    #[rstest]
    #[case(10, 4, 4)]
    #[case(3, 4, 3)]
    #[case(0, 4, 0)]
    #[case(5, 0, 0)]
    fn returns_k_or_everything(#[case] size: u64, #[case] k: usize, #[case] expected: usize) {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let picks = UniformColdStart::default().select(&catalog(size), k, &mut rng);
        assert_eq!(picks.len(), expected);
    }

    #[rstest]
    fn picks_are_distinct_members() {
        let candidates = catalog(20);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let picks = UniformColdStart::default().select(&candidates, 8, &mut rng);
        let unique: HashSet<_> = ids(&picks).into_iter().collect();
        assert_eq!(unique.len(), 8);
        assert!(unique.iter().all(|id| (1..=20).contains(id)));
    }

    #[rstest]
    fn same_seed_same_selection() {
        let candidates = catalog(12);
        let strategy = UniformColdStart::default();
        let first = strategy.select(&candidates, 5, &mut ChaCha8Rng::seed_from_u64(9));
        let second = strategy.select(&candidates, 5, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(ids(&first), ids(&second));
    }

    #[rstest]
    fn custom_explanation_is_applied() {
        let strategy = UniformColdStart::with_explanation(Explanation::ForYou);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let picks = strategy.select(&catalog(2), 2, &mut rng);
        assert!(
            picks
                .iter()
                .all(|pick| pick.explanation == Some(Explanation::ForYou))
        );
    }
}
