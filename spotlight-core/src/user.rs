//! Validated user identity keys.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised when constructing a [`UserKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserKeyError {
    /// The key was empty or whitespace only.
    #[error("user key must not be blank")]
    Blank,
}

/// Identity under which a profile is stored.
///
/// Keys are opaque strings supplied by the session layer. Surrounding
/// whitespace is trimmed and blank keys are rejected.
///
/// # Examples
/// ```
/// use spotlight_core::{UserKey, UserKeyError};
///
/// let key = UserKey::new(" alice ")?;
/// assert_eq!(key.as_str(), "alice");
/// assert_eq!(UserKey::new("   "), Err(UserKeyError::Blank));
/// # Ok::<(), UserKeyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct UserKey(String);

impl UserKey {
    /// Validate and wrap `key`.
    ///
    /// # Errors
    /// Returns [`UserKeyError::Blank`] when `key` trims to nothing.
    pub fn new(key: impl AsRef<str>) -> Result<Self, UserKeyError> {
        let trimmed = key.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserKeyError::Blank);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the key.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserKey {
    type Err = UserKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserKey {
    type Error = UserKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserKey> for String {
    fn from(key: UserKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case(" \t", false)]
    #[case("bob", true)]
    #[case("user@example.com", true)]
    fn validates_blankness(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(UserKey::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn parses_and_displays() {
        let key: UserKey = "  carol".parse().expect("non-blank key");
        assert_eq!(key.to_string(), "carol");
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialising_blank_key_fails() {
        assert!(serde_json::from_str::<UserKey>("\"  \"").is_err());
        let key: UserKey = serde_json::from_str("\"dave\"").expect("valid key");
        assert_eq!(key.as_str(), "dave");
    }
}
