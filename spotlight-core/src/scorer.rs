//! Score candidate items for a user profile.
//!
//! The [`Scorer`] trait assigns an affinity [`Score`] to a
//! [`CandidateItem`](crate::CandidateItem) given a user's
//! [`InterestProfile`](crate::InterestProfile). [`AffinityScorer`] is the
//! engine's linear heuristic.

use crate::{Axis, CandidateItem, InterestProfile};

/// Multiplier applied to the category weight.
pub const CATEGORY_COEFFICIENT: f32 = 2.0;
/// Multiplier applied to the item-type weight.
pub const TYPE_COEFFICIENT: f32 = 1.5;
/// Multiplier applied to the location weight.
pub const LOCATION_COEFFICIENT: f32 = 1.0;

/// Raw value reported for [`Score::Excluded`]. Legitimate scores are never
/// negative.
pub const EXCLUDED_SCORE: f32 = -1.0;

/// Outcome of scoring one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// Non-negative affinity; higher is a better match.
    Scored(f32),
    /// The item must not be recommended.
    Excluded,
}

impl Score {
    /// Return the raw value, using [`EXCLUDED_SCORE`] for exclusions.
    #[must_use]
    pub const fn value(self) -> f32 {
        match self {
            Self::Scored(value) => value,
            Self::Excluded => EXCLUDED_SCORE,
        }
    }

    /// Report whether this score marks an exclusion.
    #[must_use]
    pub const fn is_excluded(self) -> bool {
        matches!(self, Self::Excluded)
    }

    /// Build a score from a raw value.
    ///
    /// Negative values and NaN are exclusions. An overflowing sum saturates
    /// at `f32::MAX` so the strongest match stays rankable.
    #[must_use]
    pub fn from_raw(raw: f32) -> Self {
        if raw.is_nan() || raw < 0.0 {
            Self::Excluded
        } else {
            Self::Scored(raw.min(f32::MAX))
        }
    }
}

/// Calculate an affinity score for a candidate item.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so ranking can run
/// concurrently with other requests. Scores are infallible: return
/// `Score::Scored(0.0)` when nothing is known.
///
/// # Examples
///
/// ```rust
/// use spotlight_core::{CandidateItem, InterestProfile, Score, Scorer};
///
/// struct FlatScorer;
///
/// impl Scorer for FlatScorer {
///     fn score(&self, _item: &CandidateItem, _profile: &InterestProfile) -> Score {
///         Score::Scored(1.0)
///     }
/// }
///
/// let score = FlatScorer.score(&CandidateItem::new(1), &InterestProfile::new());
/// assert_eq!(score, Score::Scored(1.0));
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `item` according to `profile`.
    fn score(&self, item: &CandidateItem, profile: &InterestProfile) -> Score;
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn score(&self, item: &CandidateItem, profile: &InterestProfile) -> Score {
        (**self).score(item, profile)
    }
}

/// Linear scorer weighting category over type over location.
///
/// ```text
/// score = category_weight * 2.0 + type_weight * 1.5 + location_weight * 1.0
/// ```
///
/// Items in the profile's recently-viewed list are always
/// [`Score::Excluded`], even though viewing them is what raised their
/// weights.
///
/// # Examples
/// ```
/// use spotlight_core::{AffinityScorer, Axis, CandidateItem, InterestProfile, Score, Scorer};
///
/// let profile = InterestProfile::new().with_weight(Axis::Category, "Action", 6.0);
/// let item = CandidateItem::new(4).with_category("Action");
/// assert_eq!(AffinityScorer.score(&item, &profile), Score::Scored(12.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AffinityScorer;

impl AffinityScorer {
    /// Coefficient applied to weights on `axis`.
    #[must_use]
    pub const fn coefficient(axis: Axis) -> f32 {
        match axis {
            Axis::Category => CATEGORY_COEFFICIENT,
            Axis::Type => TYPE_COEFFICIENT,
            Axis::Location => LOCATION_COEFFICIENT,
        }
    }

    /// Weighted contribution of `axis` to the item's score.
    #[expect(
        clippy::float_arithmetic,
        reason = "affinity is a weighted sum of floating-point weights"
    )]
    #[must_use]
    pub fn contribution(axis: Axis, item: &CandidateItem, profile: &InterestProfile) -> f32 {
        item.label(axis)
            .map_or(0.0, |label| profile.weight(axis, label) * Self::coefficient(axis))
    }
}

impl Scorer for AffinityScorer {
    fn score(&self, item: &CandidateItem, profile: &InterestProfile) -> Score {
        if profile.has_recently_viewed(item.id) {
            return Score::Excluded;
        }
        let total: f32 = Axis::ALL
            .into_iter()
            .map(|axis| Self::contribution(axis, item, profile))
            .sum();
        Score::from_raw(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE: f32 = 1e-6;

    fn described() -> CandidateItem {
        CandidateItem::new(1)
            .with_category("Action")
            .with_type("movie")
            .with_location("Riverside")
    }

    #[rstest]
    #[case(&[], 0.0)]
    #[case(&[(Axis::Category, "Action", 1.0)], 2.0)]
    #[case(&[(Axis::Type, "movie", 2.0)], 3.0)]
    #[case(&[(Axis::Location, "Riverside", 4.0)], 4.0)]
    #[case(
        &[(Axis::Category, "Action", 1.0), (Axis::Type, "movie", 1.0), (Axis::Location, "Riverside", 1.0)],
        4.5
    )]
    #[case(&[(Axis::Category, "Comedy", 9.0)], 0.0)]
    fn weighted_sum(#[case] weights: &[(Axis, &str, f32)], #[case] expected: f32) {
        let profile = weights
            .iter()
            .fold(InterestProfile::new(), |acc, (axis, label, weight)| {
                acc.with_weight(*axis, *label, *weight)
            });
        let score = AffinityScorer.score(&described(), &profile);
        assert!((score.value() - expected).abs() <= TOLERANCE);
    }

    #[rstest]
    fn recently_viewed_is_excluded() {
        let item = described();
        let mut profile = InterestProfile::new();
        profile.record_view(&item);
        let score = AffinityScorer.score(&item, &profile);
        assert!(score.is_excluded());
        assert!(score.value() < 0.0);
    }

    #[rstest]
    fn undescribed_item_scores_zero() {
        let profile = InterestProfile::new().with_weight(Axis::Category, "Action", 5.0);
        assert_eq!(
            AffinityScorer.score(&CandidateItem::new(2), &profile),
            Score::Scored(0.0)
        );
    }

    #[rstest]
    #[case(f32::NAN)]
    #[case(f32::NEG_INFINITY)]
    #[case(-0.5)]
    fn from_raw_rejects_invalid_values(#[case] raw: f32) {
        assert_eq!(Score::from_raw(raw), Score::Excluded);
    }

    #[rstest]
    #[case(f32::INFINITY, f32::MAX)]
    #[case(0.0, 0.0)]
    #[case(7.5, 7.5)]
    fn from_raw_saturates_large_values(#[case] raw: f32, #[case] expected: f32) {
        assert_eq!(Score::from_raw(raw), Score::Scored(expected));
    }

    #[rstest]
    fn overflowing_affinity_stays_the_top_pick() {
        let profile = InterestProfile::new().with_weight(Axis::Category, "Action", f32::MAX);
        let score = AffinityScorer.score(&described(), &profile);
        assert_eq!(score, Score::Scored(f32::MAX));

        let modest = InterestProfile::new()
            .with_weight(Axis::Category, "Action", f32::MAX)
            .with_weight(Axis::Type, "comedy", 1.0);
        let other = CandidateItem::new(2).with_type("comedy");
        assert!(score.value() > AffinityScorer.score(&other, &modest).value());
    }
}
