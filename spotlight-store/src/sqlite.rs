//! Profiles kept in a single SQLite table.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, Error as SqliteError, OptionalExtension, params};
use spotlight_core::{InterestProfile, ProfileStore, UserKey};
use thiserror::Error;

use crate::codec;

/// Schema version understood by this build.
pub const SCHEMA_VERSION: i64 = 1;

/// Errors raised by [`SqliteProfileStore`].
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// The parent directory of the database could not be created.
    #[error("failed to create directory for profile database {path}: {source}")]
    CreateDir {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The database could not be opened.
    #[error("failed to open profile database {path}: {source}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// A statement failed.
    #[error("SQLite operation '{operation}' failed: {source}")]
    Sqlite {
        /// Short description of the failing step.
        operation: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// The database was written by an incompatible schema.
    #[error("expected profile schema version {expected} but found {found}")]
    VersionMismatch {
        /// Version this build writes.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
    /// A stored payload was not a valid profile.
    #[error("failed to decode the stored profile of {user}: {source}")]
    Decode {
        /// Owner of the profile.
        user: UserKey,
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

/// Profile store backed by one SQLite database.
///
/// Each row holds a user key and the profile's JSON payload. Saving the
/// same key twice replaces the earlier row.
///
/// # Examples
/// ```
/// use spotlight_core::{Axis, InterestProfile, ProfileStore, UserKey};
/// use spotlight_store::SqliteProfileStore;
///
/// let store = SqliteProfileStore::in_memory()?;
/// let user = UserKey::new("sam")?;
/// let profile = InterestProfile::new().with_weight(Axis::Category, "Music", 3.0);
///
/// store.save(&user, &profile)?;
/// assert_eq!(store.load(&user)?, Some(profile));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SqliteProfileStore {
    connection: Mutex<Connection>,
}

impl SqliteProfileStore {
    /// Open or create the database at `path`.
    ///
    /// # Errors
    /// Fails when the directory or database cannot be created, or when the
    /// database carries a different schema version.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, SqliteStoreError> {
        let path = path.as_ref();
        spotlight_fs::ensure_parent_dir(path).map_err(|source| SqliteStoreError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
        let connection = Connection::open(path).map_err(|source| SqliteStoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("opened SQLite profile store at {path}");
        Self::with_connection(connection)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Fails when SQLite cannot allocate the database.
    pub fn in_memory() -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteStoreError::Sqlite {
                operation: "open in-memory database",
                source,
            })?;
        Self::with_connection(connection)
    }

    fn with_connection(mut connection: Connection) -> Result<Self, SqliteStoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Number of stored profiles.
    ///
    /// # Errors
    /// Propagates SQLite failures.
    pub fn count(&self) -> Result<usize, SqliteStoreError> {
        let connection = self.connection();
        let rows: i64 = connection
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .map_err(|source| SqliteStoreError::Sqlite {
                operation: "count profiles",
                source,
            })?;
        Ok(usize::try_from(rows).unwrap_or_default())
    }

    fn connection(&self) -> MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn initialise_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let transaction = connection
        .transaction()
        .map_err(|source| SqliteStoreError::Sqlite {
            operation: "begin schema transaction",
            source,
        })?;

    run_step(
        &transaction,
        "create profiles",
        "CREATE TABLE IF NOT EXISTS profiles (
            user_key TEXT PRIMARY KEY NOT NULL CHECK (length(trim(user_key)) > 0),
            payload TEXT NOT NULL
        ) WITHOUT ROWID",
    )?;
    run_step(
        &transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS profile_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0)
        ) WITHOUT ROWID",
    )?;

    let existing: Option<i64> = transaction
        .query_row(
            "SELECT version FROM profile_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SqliteStoreError::Sqlite {
            operation: "read schema version",
            source,
        })?;

    match existing {
        Some(version) if version == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(SqliteStoreError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }
        None => {
            transaction
                .execute(
                    "INSERT INTO profile_schema_version (version) VALUES (?1)",
                    [SCHEMA_VERSION],
                )
                .map_err(|source| SqliteStoreError::Sqlite {
                    operation: "record schema version",
                    source,
                })?;
        }
    }

    transaction
        .commit()
        .map_err(|source| SqliteStoreError::Sqlite {
            operation: "commit schema transaction",
            source,
        })
}

fn run_step(
    transaction: &rusqlite::Transaction<'_>,
    operation: &'static str,
    sql: &str,
) -> Result<(), SqliteStoreError> {
    transaction
        .execute(sql, [])
        .map(drop)
        .map_err(|source| SqliteStoreError::Sqlite { operation, source })
}

impl ProfileStore for SqliteProfileStore {
    type Error = SqliteStoreError;

    fn load(&self, user: &UserKey) -> Result<Option<InterestProfile>, Self::Error> {
        let connection = self.connection();
        let mut statement = connection
            .prepare_cached("SELECT payload FROM profiles WHERE user_key = ?1")
            .map_err(|source| SqliteStoreError::Sqlite {
                operation: "prepare profile lookup",
                source,
            })?;
        let payload: Option<String> = statement
            .query_row([user.as_str()], |row| row.get(0))
            .optional()
            .map_err(|source| SqliteStoreError::Sqlite {
                operation: "read profile",
                source,
            })?;
        payload
            .map(|text| {
                codec::decode(user, &text).map_err(|source| SqliteStoreError::Decode {
                    user: user.clone(),
                    source,
                })
            })
            .transpose()
    }

    fn save(&self, user: &UserKey, profile: &InterestProfile) -> Result<(), Self::Error> {
        let payload = codec::encode(profile).map_err(|source| SqliteStoreError::Encode {
            user: user.clone(),
            source,
        })?;
        let connection = self.connection();
        let mut statement = connection
            .prepare_cached(
                "INSERT INTO profiles (user_key, payload) VALUES (?1, ?2)
                 ON CONFLICT(user_key) DO UPDATE SET payload = excluded.payload",
            )
            .map_err(|source| SqliteStoreError::Sqlite {
                operation: "prepare profile upsert",
                source,
            })?;
        statement
            .execute(params![user.as_str(), payload])
            .map(drop)
            .map_err(|source| SqliteStoreError::Sqlite {
                operation: "write profile",
                source,
            })
     }

    fn is_corrupt_record(&self, error: &Self::Error) -> bool {
        matches!(error, SqliteStoreError::Decode { .. })
    }
}
