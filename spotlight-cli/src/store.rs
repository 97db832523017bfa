//! Profile store selected from the resolved command configuration.

use camino::Utf8PathBuf;
use spotlight_core::{InterestProfile, ProfileStore, UserKey};
use spotlight_store::{JsonProfileStore, JsonStoreError};
#[cfg(feature = "store-sqlite")]
use spotlight_store::{SqliteProfileStore, SqliteStoreError};
use thiserror::Error;

use crate::CliError;

/// Where profiles are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreLocation {
    /// One JSON file per user under this directory.
    JsonDir(Utf8PathBuf),
    /// A SQLite database file.
    SqliteDb(Utf8PathBuf),
}

/// Failures from whichever backend is in use.
#[derive(Debug, Error)]
pub enum StoreError {
    /// JSON directory backend failure.
    #[error(transparent)]
    Json(#[from] JsonStoreError),
    /// SQLite backend failure.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Sqlite(#[from] SqliteStoreError),
}

/// The backend chosen for this invocation.
#[derive(Debug)]
pub(crate) enum CliStore {
    Json(JsonProfileStore),
    #[cfg(feature = "store-sqlite")]
    Sqlite(SqliteProfileStore),
}

impl CliStore {
    pub(crate) fn open(location: &StoreLocation) -> Result<Self, CliError> {
        match location {
            StoreLocation::JsonDir(root) => JsonProfileStore::open(root)
                .map(Self::Json)
                .map_err(|source| CliError::OpenStore(source.into())),
            #[cfg(feature = "store-sqlite")]
            StoreLocation::SqliteDb(path) => SqliteProfileStore::open(path)
                .map(Self::Sqlite)
                .map_err(|source| CliError::OpenStore(source.into())),
            #[cfg(not(feature = "store-sqlite"))]
            StoreLocation::SqliteDb(_) => Err(CliError::MissingFeature {
                feature: "store-sqlite",
                action: "using a SQLite profile database",
            }),
        }
    }
}

impl ProfileStore for CliStore {
    type Error = StoreError;

    fn load(&self, user: &UserKey) -> Result<Option<InterestProfile>, Self::Error> {
        match self {
            Self::Json(store) => Ok(store.load(user)?),
            #[cfg(feature = "store-sqlite")]
            Self::Sqlite(store) => Ok(store.load(user)?),
        }
    }

    fn save(&self, user: &UserKey, profile: &InterestProfile) -> Result<(), Self::Error> {
        match self {
            Self::Json(store) => Ok(store.save(user, profile)?),
            #[cfg(feature = "store-sqlite")]
            Self::Sqlite(store) => Ok(store.save(user, profile)?),
        }
    }

    fn is_corrupt_record(&self, error: &Self::Error) -> bool {
        match (self, error) {
            (Self::Json(store), StoreError::Json(inner)) => store.is_corrupt_record(inner),
            #[cfg(feature = "store-sqlite")]
            (Self::Sqlite(store), StoreError::Sqlite(inner)) => store.is_corrupt_record(inner),
            #[cfg(feature = "store-sqlite")]
            _ => false,
        }
    }
}
