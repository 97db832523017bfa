//! Persistent [`ProfileStore`](spotlight_core::ProfileStore) backends.
//!
//! - [`JsonProfileStore`] keeps one JSON document per user in a directory.
//! - [`SqliteProfileStore`] keeps every profile in a single SQLite table
//!   (enabled by the `store-sqlite` feature).
//!
//! Both backends write the same JSON shape:
//!
//! ```json
//! {"categories":{"Action":6.0},"types":{},"locations":{},"recentlyViewed":[1]}
//! ```
//!
//! and normalise what they read with
//! [`InterestProfile::sanitised`](spotlight_core::InterestProfile::sanitised).
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod codec;
pub mod json;
#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub mod sqlite;

pub use json::{JsonProfileStore, JsonStoreError, encode_user_key};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteProfileStore, SqliteStoreError};
