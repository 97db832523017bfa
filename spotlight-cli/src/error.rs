//! Error types emitted by the Spotlight CLI.
//!
//! Store failures during `view`, `book`, `reset` and `recommend` are not
//! errors: the service reports them as warnings and the command carries on.

use std::sync::Arc;

use camino::Utf8PathBuf;
use spotlight_core::{ItemId, UserKeyError};
use thiserror::Error;

use crate::store::StoreError;

/// Errors emitted by the Spotlight CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// The user key was blank.
    #[error("invalid user: {0}")]
    InvalidUser(#[from] UserKeyError),
    /// Reading the catalog file failed.
    #[error("failed to read catalog at {path:?}: {source}")]
    ReadCatalog {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The catalog file is not a JSON array of items.
    #[error("failed to parse catalog JSON at {path:?}: {source}")]
    ParseCatalog {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The catalog lists the same id twice.
    #[error("catalog {path:?} lists item {id} more than once")]
    DuplicateItem { path: Utf8PathBuf, id: ItemId },
    /// The signalled item is not in the catalog.
    #[error("item {id} is not in catalog {path:?}")]
    UnknownItem { path: Utf8PathBuf, id: ItemId },
    /// The profile store could not be opened.
    #[error("failed to open profile store: {0}")]
    OpenStore(#[source] StoreError),
    /// Serialising command output failed.
    #[error("failed to serialise command output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
