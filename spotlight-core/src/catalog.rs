//! Candidate sources and listing filters.

use crate::{CandidateItem, ItemId};

/// Label meaning "no restriction" in a [`CandidateFilter`].
const MATCH_ALL: &str = "all";

/// Detail key flagging an item as featured.
pub const FEATURED_DETAIL: &str = "featured";

/// Supply the items that may be recommended.
///
/// Implementations must be thread-safe so a recompute worker can read the
/// catalog while signals are being recorded.
pub trait CandidateSource: Send + Sync {
    /// Iterate every candidate in catalog order.
    fn candidates(&self) -> Box<dyn Iterator<Item = CandidateItem> + Send + '_>;

    /// Look up a single item by id.
    fn find(&self, id: ItemId) -> Option<CandidateItem> {
        self.candidates().find(|item| item.id == id)
    }

    /// Collect the candidates accepted by `filter`, keeping catalog order.
    fn filtered(&self, filter: &CandidateFilter) -> Vec<CandidateItem> {
        self.candidates().filter(|item| filter.matches(item)).collect()
    }
}

/// Restrict a listing by category, item type, free-text search and the
/// featured flag.
///
/// An absent criterion, or one equal to `"all"` (any case), accepts every
/// item. Category and type compare labels exactly. The search text matches
/// case-insensitively against the `title` detail and the location. An item
/// is featured when its `featured` detail reads `true` in any case.
///
/// # Examples
/// ```
/// use spotlight_core::{CandidateFilter, CandidateItem};
///
/// let item = CandidateItem::new(1)
///     .with_type("concert")
///     .with_location("Harbour Hall")
///     .with_detail("title", "Winter Strings");
///
/// assert!(CandidateFilter::default().with_type("all").matches(&item));
/// assert!(CandidateFilter::default().with_search("harbour").matches(&item));
/// assert!(!CandidateFilter::default().with_type("movie").matches(&item));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    /// Required category label.
    pub category: Option<String>,
    /// Required item-type label.
    pub item_type: Option<String>,
    /// Case-insensitive text searched in title and location.
    pub search: Option<String>,
    /// Required value of the featured flag.
    pub featured: Option<bool>,
}

impl CandidateFilter {
    /// Require `category`.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Require `item_type`.
    #[must_use]
    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Require `search` in the title or location.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Require the featured flag to equal `featured`.
    #[must_use]
    pub const fn with_featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    /// Report whether `item` passes every criterion.
    #[must_use]
    pub fn matches(&self, item: &CandidateItem) -> bool {
        label_matches(self.category.as_deref(), item.category.as_deref())
            && label_matches(self.item_type.as_deref(), item.item_type.as_deref())
            && self.search_matches(item)
            && self.featured.is_none_or(|wanted| is_featured(item) == wanted)
    }

    fn search_matches(&self, item: &CandidateItem) -> bool {
        let Some(raw) = self.search.as_deref().map(str::trim) else {
            return true;
        };
        if raw.is_empty() {
            return true;
        }
        let needle = raw.to_lowercase();
        let title = item.details.get("title").map(String::as_str);
        [title, item.location.as_deref()]
            .into_iter()
            .flatten()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

fn is_featured(item: &CandidateItem) -> bool {
    item.details
        .get(FEATURED_DETAIL)
        .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true"))
}

fn label_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(label) if label.eq_ignore_ascii_case(MATCH_ALL) => true,
        Some(label) => actual == Some(label),
    }
}

/// Catalog held in memory, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCatalog {
    items: Vec<CandidateItem>,
}

impl MemoryCatalog {
    /// Create a catalog from `items`.
    #[must_use]
    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = CandidateItem>,
    {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// Borrow the items.
    #[must_use]
    pub const fn items(&self) -> &[CandidateItem] {
        self.items.as_slice()
    }

    /// Number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Report whether the catalog is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CandidateSource for MemoryCatalog {
    fn candidates(&self) -> Box<dyn Iterator<Item = CandidateItem> + Send + '_> {
        Box::new(self.items.iter().cloned())
    }
}
