//! Catalog items offered to the engine as recommendation candidates.

use std::collections::BTreeMap;

use crate::Axis;

/// Identifier of a catalog item. Unique within one candidate set.
pub type ItemId = u64;

/// Display fields the engine never reads (title, date, price, ...).
pub type Details = BTreeMap<String, String>;

/// A catalog item that may be recommended.
///
/// Only `id`, `category`, `item_type` and `location` influence scoring; a
/// missing or blank descriptor simply contributes nothing on its axis.
/// `details` is carried through untouched for the presentation layer.
///
/// # Examples
/// ```
/// use spotlight_core::{Axis, CandidateItem};
///
/// let item = CandidateItem::new(7)
///     .with_category("Jazz")
///     .with_type("concert")
///     .with_detail("title", "Late Night Trio");
///
/// assert_eq!(item.label(Axis::Category), Some("Jazz"));
/// assert_eq!(item.label(Axis::Location), None);
/// assert_eq!(item.details.get("title").map(String::as_str), Some("Late Night Trio"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateItem {
    /// Unique identifier.
    pub id: ItemId,
    /// Category label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<String>,
    /// Item-type label; serialised as `type`.
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub item_type: Option<String>,
    /// Location label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<String>,
    /// Opaque presentation fields.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub details: Details,
}

impl CandidateItem {
    /// Construct an item with no descriptors.
    #[must_use]
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Set the category label while returning `self` for chaining.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the item-type label while returning `self` for chaining.
    #[must_use]
    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Set the location label while returning `self` for chaining.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Add a passthrough display field.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Return the label describing this item on `axis`.
    ///
    /// Blank labels are reported as absent.
    #[must_use]
    pub fn label(&self, axis: Axis) -> Option<&str> {
        let raw = match axis {
            Axis::Category => self.category.as_deref(),
            Axis::Type => self.item_type.as_deref(),
            Axis::Location => self.location.as_deref(),
        };
        raw.filter(|label| !label.trim().is_empty())
    }
}
