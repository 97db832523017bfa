//! Human-readable reasons attached to each recommendation.
//!
//! One rule set decides every explanation: an axis counts as a reason when
//! its contribution to the score (`weight × coefficient`) exceeds
//! [`STRONG_INTEREST_FLOOR`]. With the scoring coefficients that means
//!
//! | axis     | coefficient | qualifies when weight is |
//! |----------|-------------|--------------------------|
//! | category | 2.0         | above 2                  |
//! | type     | 1.5         | above 8/3                |
//! | location | 1.0         | above 4                  |
//!
//! so a single booking (weight 3) qualifies category and type, while three
//! views of the same category are needed before the category is cited.
//! Axes are tried in category, type, location order and the first match
//! wins.

use std::fmt;

use crate::{AffinityScorer, Axis, CandidateItem, InterestProfile};

/// Minimum weighted contribution an axis needs to be cited as the reason.
pub const STRONG_INTEREST_FLOOR: f32 = 4.0;

/// Why an item was recommended.
///
/// `Display` renders the sentence shown to the user.
///
/// # Examples
/// ```
/// use spotlight_core::Explanation;
///
/// let reason = Explanation::CategoryInterest { category: "Jazz".into() };
/// assert_eq!(reason.to_string(), "Based on your interest in Jazz events");
/// assert_eq!(Explanation::ForYou.to_string(), "Recommended for you");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Explanation {
    /// The user shows strong interest in the item's category.
    CategoryInterest {
        /// Matched category label.
        category: String,
    },
    /// The user likes this type of item.
    TypeInterest {
        /// Matched item-type label.
        item_type: String,
    },
    /// The user keeps returning to this location.
    LocationInterest {
        /// Matched location label.
        location: String,
    },
    /// Personalised pick without a single dominant reason.
    ForYou,
    /// Cold-start pick made before any signal was recorded.
    Trending,
}

impl Explanation {
    /// Axis cited by this explanation, if any.
    #[must_use]
    pub const fn axis(&self) -> Option<Axis> {
        match self {
            Self::CategoryInterest { .. } => Some(Axis::Category),
            Self::TypeInterest { .. } => Some(Axis::Type),
            Self::LocationInterest { .. } => Some(Axis::Location),
            Self::ForYou | Self::Trending => None,
        }
    }

    fn for_axis(axis: Axis, label: &str) -> Self {
        match axis {
            Axis::Category => Self::CategoryInterest {
                category: label.to_owned(),
            },
            Axis::Type => Self::TypeInterest {
                item_type: label.to_owned(),
            },
            Axis::Location => Self::LocationInterest {
                location: label.to_owned(),
            },
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategoryInterest { category } => {
                write!(f, "Based on your interest in {category} events")
            }
            Self::TypeInterest { item_type } => write!(f, "Because you like {item_type}s"),
            Self::LocationInterest { location } => {
                write!(f, "Events at {location} you might enjoy")
            }
            Self::ForYou => f.write_str("Recommended for you"),
            Self::Trending => f.write_str("New and trending events you might enjoy"),
        }
    }
}

/// Choose one explanation for a recommended item.
pub trait Explainer: Send + Sync {
    /// Explain why `item` suits `profile`.
    fn explain(&self, item: &CandidateItem, profile: &InterestProfile) -> Explanation;
}

/// Explainer applying the fixed contribution threshold described in the
/// module docs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThresholdExplainer;

impl ThresholdExplainer {
    /// Report whether `axis` contributes strongly enough to be cited.
    #[must_use]
    pub fn is_strong(axis: Axis, item: &CandidateItem, profile: &InterestProfile) -> bool {
        AffinityScorer::contribution(axis, item, profile) > STRONG_INTEREST_FLOOR
    }
}

impl Explainer for ThresholdExplainer {
    fn explain(&self, item: &CandidateItem, profile: &InterestProfile) -> Explanation {
        Axis::ALL
            .into_iter()
            .find(|axis| Self::is_strong(*axis, item, profile))
            .and_then(|axis| {
                item.label(axis)
                    .map(|label| Explanation::for_axis(axis, label))
            })
            .unwrap_or(Explanation::ForYou)
    }
}
