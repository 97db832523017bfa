//! Signal intake: how views and bookings move an interest profile.

use crate::{Axis, CandidateItem, InterestProfile};

/// An observed user action on a catalog item.
///
/// # Examples
/// ```
/// use spotlight_core::{Axis, CandidateItem, InterestProfile, Signal};
///
/// let item = CandidateItem::new(1).with_category("Action");
/// let mut profile = InterestProfile::new();
/// profile.record(Signal::Booking, &item);
/// assert_eq!(profile.weight(Axis::Category, "Action"), 3.0);
/// assert!(profile.recently_viewed().is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The user opened the item's details.
    View,
    /// The user booked the item; a stronger signal than a view.
    Booking,
}

impl Signal {
    /// Weight added to every described axis of the item.
    #[must_use]
    pub const fn increment(self) -> f32 {
        match self {
            Self::View => 1.0,
            Self::Booking => 3.0,
        }
    }

    /// Return the signal name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Booking => "booking",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InterestProfile {
    /// Apply `signal` for `item`.
    ///
    /// Every axis the item describes gains [`Signal::increment`]; blank axes
    /// are skipped. Views additionally move the item to the front of the
    /// recently-viewed list. Bookings leave that list untouched.
    pub fn record(&mut self, signal: Signal, item: &CandidateItem) {
        let increment = signal.increment();
        for axis in Axis::ALL {
            if let Some(label) = item.label(axis) {
                self.add_weight(axis, label, increment);
            }
        }
        if signal == Signal::View {
            self.push_recently_viewed(item.id);
        }
    }

    /// Record that the user viewed `item`.
    pub fn record_view(&mut self, item: &CandidateItem) {
        self.record(Signal::View, item);
    }

    /// Record that the user booked `item`.
    pub fn record_booking(&mut self, item: &CandidateItem) {
        self.record(Signal::Booking, item);
    }
}
