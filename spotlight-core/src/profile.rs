//! Interest profiles: accumulated per-axis weights plus recent views.
//!
//! A profile starts blank, grows through [`Signal`](crate::Signal)s and is
//! only ever shrunk by [`InterestProfile::reset`]. Weights are unbounded but
//! never negative.

use std::collections::BTreeMap;

use crate::{Axis, ItemId};

/// Maximum number of entries kept in the recently-viewed list.
pub const RECENTLY_VIEWED_CAP: usize = 10;

/// Weights keyed by label on a single axis.
pub type Weights = BTreeMap<String, f32>;

/// A user's accumulated preferences.
///
/// The serialised shape uses the keys `categories`, `types`, `locations` and
/// `recentlyViewed`. A key that is missing or holds the wrong shape reads as
/// empty, and entries that are not numbers are dropped.
///
/// # Examples
/// ```
/// use spotlight_core::{Axis, InterestProfile};
///
/// let profile = InterestProfile::new()
///     .with_weight(Axis::Category, "Action", 3.0)
///     .with_weight(Axis::Location, "Riverside", 1.0);
/// assert_eq!(profile.weight(Axis::Category, "Action"), 3.0);
/// assert_eq!(profile.weight(Axis::Type, "movie"), 0.0);
/// assert!(!profile.is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct InterestProfile {
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::weights")
    )]
    categories: Weights,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::weights")
    )]
    types: Weights,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::weights")
    )]
    locations: Weights,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::item_ids")
    )]
    recently_viewed: Vec<ItemId>,
}

impl InterestProfile {
    /// Construct a blank profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report whether the profile carries no signal at all.
    ///
    /// A profile whose weights are all zero is *not* blank; only a profile
    /// with no entries on any axis and no recent views is.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.categories.is_empty()
            && self.types.is_empty()
            && self.locations.is_empty()
            && self.recently_viewed.is_empty()
    }

    /// Return the weight stored for `label` on `axis`, or `0.0`.
    #[must_use]
    pub fn weight(&self, axis: Axis, label: &str) -> f32 {
        if label.trim().is_empty() {
            return 0.0;
        }
        self.weights(axis).get(label).copied().unwrap_or(0.0)
    }

    /// Borrow every weight recorded on `axis`.
    #[must_use]
    pub const fn weights(&self, axis: Axis) -> &Weights {
        match axis {
            Axis::Category => &self.categories,
            Axis::Type => &self.types,
            Axis::Location => &self.locations,
        }
    }

    /// Recently viewed item ids, most recent first.
    #[must_use]
    pub fn recently_viewed(&self) -> &[ItemId] {
        &self.recently_viewed
    }

    /// Report whether `id` is in the recently-viewed list.
    #[must_use]
    pub fn has_recently_viewed(&self, id: ItemId) -> bool {
        self.recently_viewed.contains(&id)
    }

    /// Insert or replace a weight.
    ///
    /// Negative and non-finite values are stored as `0.0`. Blank labels are
    /// ignored.
    pub fn set_weight(&mut self, axis: Axis, label: impl Into<String>, weight: f32) {
        let owned: String = label.into();
        if owned.trim().is_empty() {
            return;
        }
        self.weights_mut(axis).insert(owned, sanitise_weight(weight));
    }

    /// Add a weight while returning `self` for chaining.
    #[must_use]
    pub fn with_weight(mut self, axis: Axis, label: impl Into<String>, weight: f32) -> Self {
        self.set_weight(axis, label, weight);
        self
    }

    /// Clear every weight and the recently-viewed list.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Normalise a profile read from an untrusted source.
    ///
    /// Drops blank labels, replaces negative or non-finite weights with
    /// `0.0`, removes duplicate recent views (keeping the most recent) and
    /// enforces [`RECENTLY_VIEWED_CAP`].
    #[must_use]
    pub fn sanitised(self) -> Self {
        let Self {
            categories,
            types,
            locations,
            recently_viewed,
        } = self;
        let mut seen = std::collections::HashSet::new();
        let mut recent: Vec<ItemId> = recently_viewed
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        recent.truncate(RECENTLY_VIEWED_CAP);
        Self {
            categories: sanitise_weights(categories),
            types: sanitise_weights(types),
            locations: sanitise_weights(locations),
            recently_viewed: recent,
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "signal intake accumulates floating-point weights"
    )]
    pub(crate) fn add_weight(&mut self, axis: Axis, label: &str, increment: f32) {
        let slot = self.weights_mut(axis).entry(label.to_owned()).or_insert(0.0);
        *slot = sanitise_weight(*slot + increment);
    }

    pub(crate) fn push_recently_viewed(&mut self, id: ItemId) {
        self.recently_viewed.retain(|existing| *existing != id);
        self.recently_viewed.insert(0, id);
        self.recently_viewed.truncate(RECENTLY_VIEWED_CAP);
    }

    const fn weights_mut(&mut self, axis: Axis) -> &mut Weights {
        match axis {
            Axis::Category => &mut self.categories,
            Axis::Type => &mut self.types,
            Axis::Location => &mut self.locations,
        }
    }
}

fn sanitise_weight(weight: f32) -> f32 {
    if !weight.is_finite() {
        return 0.0;
    }
    weight.max(0.0)
}

fn sanitise_weights(weights: Weights) -> Weights {
    weights
        .into_iter()
        .filter(|(label, _)| !label.trim().is_empty())
        .map(|(label, weight)| (label, sanitise_weight(weight)))
        .collect()
}

#[cfg(feature = "serde")]
mod lenient {
    //! Stored-profile decoders that read malformed fields as empty.

    use std::collections::BTreeMap;

    use serde::de::{Deserialize, Deserializer, IgnoredAny};

    use super::Weights;
    use crate::ItemId;

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Field<T> {
        Present(T),
        Malformed(IgnoredAny),
    }

    impl<T> Field<T> {
        fn into_option(self) -> Option<T> {
            match self {
                Self::Present(value) => Some(value),
                Self::Malformed(IgnoredAny) => None,
            }
        }
    }

    pub(super) fn weights<'de, D>(deserializer: D) -> Result<Weights, D::Error>
    where
        D: Deserializer<'de>,
    {
        let field = Field::<BTreeMap<String, Field<f32>>>::deserialize(deserializer)?;
        Ok(field
            .into_option()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(label, weight)| weight.into_option().map(|value| (label, value)))
            .collect())
    }

    pub(super) fn item_ids<'de, D>(deserializer: D) -> Result<Vec<ItemId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let field = Field::<Vec<Field<ItemId>>>::deserialize(deserializer)?;
        Ok(field
            .into_option()
            .unwrap_or_default()
            .into_iter()
            .filter_map(Field::into_option)
            .collect())
    }
}
