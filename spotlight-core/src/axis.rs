//! Preference axes tracked by an interest profile.
//!
//! Every candidate item is described along three axes and every signal
//! updates all three at once.
//!
//! # Examples
//! ```
//! use spotlight_core::Axis;
//!
//! assert_eq!(Axis::Category.as_str(), "category");
//! assert_eq!(Axis::Location.to_string(), "location");
//! ```

/// One dimension of user interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Genre-like grouping such as "Action" or "Jazz".
    Category,
    /// Kind of event such as "movie" or "concert".
    Type,
    /// Venue or area where the event happens.
    Location,
}

impl Axis {
    /// All axes in explanation priority order.
    pub const ALL: [Self; 3] = [Self::Category, Self::Type, Self::Location];

    /// Return the axis as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use spotlight_core::Axis;
    ///
    /// assert_eq!(Axis::Type.as_str(), "type");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Type => "type",
            Self::Location => "location",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "type" => Ok(Self::Type),
            "location" => Ok(Self::Location),
            _ => Err(format!("unknown axis '{s}'")),
        }
    }
}
