//! One JSON file per user.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8;
use spotlight_core::{InterestProfile, ProfileStore, UserKey};
use thiserror::Error;

use crate::codec;

/// Errors raised by [`JsonProfileStore`].
#[derive(Debug, Error)]
pub enum JsonStoreError {
    /// The store directory could not be created or opened.
    #[error("failed to open profile directory {path}: {source}")]
    OpenRoot {
        /// Store directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A profile file could not be read.
    #[error("failed to read profile file {path}: {source}")]
    Read {
        /// Profile file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A profile file could not be written.
    #[error("failed to write profile file {path}: {source}")]
    Write {
        /// Profile file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A profile file did not contain a valid profile.
    #[error("failed to decode profile file {path}: {source}")]
    Decode {
        /// Profile file.
        path: Utf8PathBuf,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A profile could not be serialised.
    #[error("failed to encode the profile of {user}: {source}")]
    Encode {
        /// Owner of the profile.
        user: UserKey,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Encode a user key as a portable file stem.
///
/// ASCII letters, digits, `-` and `_` are kept; every other byte becomes
/// `%XX`. Distinct keys always map to distinct stems.
///
/// # Examples
/// ```
/// use spotlight_core::UserKey;
/// use spotlight_store::encode_user_key;
///
/// let key = UserKey::new("ana.b@example.com")?;
/// assert_eq!(encode_user_key(&key), "ana%2Eb%40example%2Ecom");
/// # Ok::<(), spotlight_core::UserKeyError>(())
/// ```
#[must_use]
pub fn encode_user_key(user: &UserKey) -> String {
    use std::fmt::Write as _;

    user.as_str()
        .bytes()
        .fold(String::new(), |mut encoded, byte| {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                encoded.push(char::from(byte));
            } else {
                // Writing to a `String` cannot fail.
                drop(write!(encoded, "%{byte:02X}"));
            }
            encoded
        })
}

/// Profile store keeping `<encoded-key>.json` files under a root directory.
///
/// Writes go through a temporary file and a rename, so a crash never
/// leaves a truncated profile behind.
///
/// # Examples
/// ```
/// use spotlight_core::{InterestProfile, ProfileStore, UserKey};
/// use spotlight_store::JsonProfileStore;
///
/// let temp = tempfile::tempdir()?;
/// let root = camino::Utf8Path::from_path(temp.path()).ok_or("non-UTF-8 temp dir")?;
/// let store = JsonProfileStore::open(root.join("profiles"))?;
/// let user = UserKey::new("lee")?;
///
/// store.save(&user, &InterestProfile::new())?;
/// assert_eq!(store.load(&user)?, Some(InterestProfile::new()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct JsonProfileStore {
    root: Utf8PathBuf,
    dir: fs_utf8::Dir,
}

impl JsonProfileStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns [`JsonStoreError::OpenRoot`] when the directory cannot be
    /// created or opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, JsonStoreError> {
        let path = root.as_ref().to_path_buf();
        let dir = spotlight_fs::open_or_create_dir(&path).map_err(|source| {
            JsonStoreError::OpenRoot {
                path: path.clone(),
                source,
            }
        })?;
        log::debug!("opened JSON profile store at {path}");
        Ok(Self { root: path, dir })
    }

    /// Directory holding the profile files.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the file holding `user`'s profile.
    #[must_use]
    pub fn profile_path(&self, user: &UserKey) -> Utf8PathBuf {
        self.root.join(file_name(user))
    }
}

fn file_name(user: &UserKey) -> String {
    format!("{}.json", encode_user_key(user))
}

impl ProfileStore for JsonProfileStore {
    type Error = JsonStoreError;

    fn load(&self, user: &UserKey) -> Result<Option<InterestProfile>, Self::Error> {
        let name = file_name(user);
        let Some(payload) = spotlight_fs::read_optional(&self.dir, &name).map_err(|source| {
            JsonStoreError::Read {
                path: self.root.join(&name),
                source,
            }
        })?
        else {
            return Ok(None);
        };
        codec::decode(user, &payload)
            .map(Some)
            .map_err(|source| JsonStoreError::Decode {
                path: self.root.join(&name),
                source,
            })
    }

    fn save(&self, user: &UserKey, profile: &InterestProfile) -> Result<(), Self::Error> {
        let payload = codec::encode(profile).map_err(|source| JsonStoreError::Encode {
            user: user.clone(),
            source,
        })?;
        let name = file_name(user);
        spotlight_fs::write_atomic(&self.dir, &name, payload.as_bytes()).map_err(|source| {
            JsonStoreError::Write {
                path: self.root.join(&name),
                source,
            }
        })
    }
    fn is_corrupt_record(&self, error: &Self::Error) -> bool {
        matches!(error, JsonStoreError::Decode { .. })
    }
}
