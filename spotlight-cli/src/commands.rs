//! `view`, `book`, `reset` and `recommend` command implementations.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use spotlight_core::{
    CandidateFilter, CandidateSource, DEFAULT_RECOMMENDATION_COUNT, ItemId, Outcome,
    PreferenceService, RecommendationPath, Recommendations, Signal, UserKey,
};

use crate::catalog::{load_catalog, require_item};
use crate::store::{CliStore, StoreError, StoreLocation};
use crate::{
    ARG_CATALOG, ARG_CATEGORY, ARG_FEATURED, ARG_ITEM, ARG_LIMIT, ARG_SEARCH, ARG_SEED,
    ARG_STORE_DB, ARG_STORE_DIR, ARG_TYPE, ARG_USER, CliError, DEFAULT_STORE_DIR,
    ENV_RECOMMEND_CATALOG, ENV_RECOMMEND_USER, ENV_RESET_USER, ENV_SIGNAL_CATALOG,
    ENV_SIGNAL_ITEM, ENV_SIGNAL_USER,
};

/// CLI arguments shared by the `view` and `book` subcommands.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "signal",
    about = "Record an interest signal for a catalog item"
)]
#[ortho_config(prefix = "SPOTLIGHT")]
pub(crate) struct SignalArgs {
    /// Identifier of the catalog item.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) item: Option<ItemId>,
    /// Key identifying the user.
    #[arg(long = ARG_USER, value_name = "key")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Path to the JSON catalog file.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Directory holding one JSON profile per user.
    #[arg(long = ARG_STORE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) store_dir: Option<Utf8PathBuf>,
    /// SQLite database to keep profiles in instead of the JSON directory.
    #[arg(long = ARG_STORE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) store_db: Option<Utf8PathBuf>,
}

/// CLI arguments for the `reset` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "reset", about = "Forget a user's learned preferences")]
#[ortho_config(prefix = "SPOTLIGHT")]
pub(crate) struct ResetArgs {
    /// Key identifying the user.
    #[arg(long = ARG_USER, value_name = "key")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Directory holding one JSON profile per user.
    #[arg(long = ARG_STORE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) store_dir: Option<Utf8PathBuf>,
    /// SQLite database to keep profiles in instead of the JSON directory.
    #[arg(long = ARG_STORE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) store_db: Option<Utf8PathBuf>,
}

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "recommend",
    long_about = "Recommend catalog items for a user. Users without any \
                 recorded interest receive a random selection; pass --seed \
                 to make that selection reproducible. The category, type \
                 and search filters narrow the catalog before ranking.",
    about = "Recommend catalog items for a user"
)]
#[ortho_config(prefix = "SPOTLIGHT")]
pub(crate) struct RecommendArgs {
    /// Key identifying the user.
    #[arg(long = ARG_USER, value_name = "key")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Path to the JSON catalog file.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Directory holding one JSON profile per user.
    #[arg(long = ARG_STORE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) store_dir: Option<Utf8PathBuf>,
    /// SQLite database to keep profiles in instead of the JSON directory.
    #[arg(long = ARG_STORE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) store_db: Option<Utf8PathBuf>,
    /// Maximum number of recommendations.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Seed for the cold-start selection.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Only consider items in this category (`all` for any).
    #[arg(long = ARG_CATEGORY, value_name = "label")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Only consider items of this type (`all` for any).
    #[arg(long = ARG_TYPE, value_name = "label")]
    #[serde(default)]
    pub(crate) item_type: Option<String>,
    /// Only consider items whose title or location contains this text.
    #[arg(long = ARG_SEARCH, value_name = "text")]
    #[serde(default)]
    pub(crate) search: Option<String>,
    /// Only consider featured (`true`) or non-featured (`false`) items.
    #[arg(long = ARG_FEATURED, value_name = "bool")]
    #[serde(default)]
    pub(crate) featured: Option<bool>,
}

impl SignalArgs {
    pub(crate) fn into_config(self) -> Result<SignalConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SignalConfig::try_from(merged)
    }
}

impl ResetArgs {
    pub(crate) fn into_config(self) -> Result<ResetConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ResetConfig::try_from(merged)
    }
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Resolved `view` / `book` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignalConfig {
    pub(crate) item: ItemId,
    pub(crate) user: UserKey,
    pub(crate) catalog: Utf8PathBuf,
    pub(crate) store: StoreLocation,
}

/// Resolved `reset` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResetConfig {
    pub(crate) user: UserKey,
    pub(crate) store: StoreLocation,
}

/// Resolved `recommend` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendConfig {
    pub(crate) user: UserKey,
    pub(crate) catalog: Utf8PathBuf,
    pub(crate) store: StoreLocation,
    pub(crate) limit: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) filter: CandidateFilter,
}

fn require_user(user: Option<String>, env: &'static str) -> Result<UserKey, CliError> {
    let raw = user.ok_or(CliError::MissingArgument {
        field: ARG_USER,
        env,
    })?;
    Ok(UserKey::new(raw)?)
}

fn store_location(dir: Option<Utf8PathBuf>, db: Option<Utf8PathBuf>) -> StoreLocation {
    db.map_or_else(
        || StoreLocation::JsonDir(dir.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_STORE_DIR))),
        StoreLocation::SqliteDb,
    )
}

impl TryFrom<SignalArgs> for SignalConfig {
    type Error = CliError;

    fn try_from(args: SignalArgs) -> Result<Self, Self::Error> {
        let item = args.item.ok_or(CliError::MissingArgument {
            field: ARG_ITEM,
            env: ENV_SIGNAL_ITEM,
        })?;
        let user = require_user(args.user, ENV_SIGNAL_USER)?;
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_SIGNAL_CATALOG,
        })?;
        Ok(Self {
            item,
            user,
            catalog,
            store: store_location(args.store_dir, args.store_db),
        })
    }
}

impl TryFrom<ResetArgs> for ResetConfig {
    type Error = CliError;

    fn try_from(args: ResetArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            user: require_user(args.user, ENV_RESET_USER)?,
            store: store_location(args.store_dir, args.store_db),
        })
    }
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let user = require_user(args.user, ENV_RECOMMEND_USER)?;
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_RECOMMEND_CATALOG,
        })?;
        let filter = CandidateFilter {
            category: args.category,
            item_type: args.item_type,
            search: args.search,
            featured: args.featured,
        };
        Ok(Self {
            user,
            catalog,
            store: store_location(args.store_dir, args.store_db),
            limit: args.limit.unwrap_or(DEFAULT_RECOMMENDATION_COUNT),
            seed: args.seed,
            filter,
        })
    }
}

/// JSON document written by `recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RecommendOutput {
    pub(crate) path: RecommendationPath,
    pub(crate) items: Vec<RecommendedItem>,
}

/// One entry of [`RecommendOutput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RecommendedItem {
    pub(crate) id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    pub(crate) explanation: String,
    pub(crate) score: f32,
}

impl From<&Recommendations> for RecommendOutput {
    fn from(picks: &Recommendations) -> Self {
        let items = picks
            .entries()
            .iter()
            .map(|entry| RecommendedItem {
                id: entry.item.id,
                title: entry.item.details.get("title").cloned(),
                explanation: entry
                    .explanation
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                score: entry.score,
            })
            .collect();
        Self {
            path: picks.path(),
            items,
        }
    }
}

pub(crate) fn run_signal_with(
    args: SignalArgs,
    signal: Signal,
    out: &mut dyn Write,
    warnings: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_signal(&config, signal, out, warnings)
}

pub(crate) fn execute_signal(
    config: &SignalConfig,
    signal: Signal,
    out: &mut dyn Write,
    warnings: &mut dyn Write,
) -> Result<(), CliError> {
    let catalog = load_catalog(&config.catalog)?;
    let item = require_item(&catalog, &config.catalog, config.item)?;
    let service = open_service(&config.store)?;
    let profile = report(service.record(&config.user, signal, &item), warnings)?;
    write_json(out, &profile)
}

pub(crate) fn run_reset_with(args: ResetArgs, warnings: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_reset(&config, warnings)
}

pub(crate) fn execute_reset(config: &ResetConfig, warnings: &mut dyn Write) -> Result<(), CliError> {
    let service = open_service(&config.store)?;
    report(service.reset_preferences(&config.user), warnings)
}

pub(crate) fn run_recommend_with(
    args: RecommendArgs,
    out: &mut dyn Write,
    warnings: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_recommend(&config, out, warnings)
}

pub(crate) fn execute_recommend(
    config: &RecommendConfig,
    out: &mut dyn Write,
    warnings: &mut dyn Write,
) -> Result<(), CliError> {
    let catalog = load_catalog(&config.catalog)?;
    let candidates = catalog.filtered(&config.filter);
    let service = open_service(&config.store)?;
    let mut rng = config
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let picks = report(
        service.recommend(&config.user, &candidates, config.limit, &mut rng),
        warnings,
    )?;
    write_json(out, &RecommendOutput::from(&picks))
}

fn open_service(location: &StoreLocation) -> Result<PreferenceService<CliStore>, CliError> {
    Ok(PreferenceService::new(CliStore::open(location)?))
}

/// Print any store warnings and hand back the value.
fn report<T>(outcome: Outcome<T, StoreError>, warnings: &mut dyn Write) -> Result<T, CliError> {
    for warning in &outcome.warnings {
        writeln!(warnings, "warning: {}", with_causes(warning)).map_err(CliError::WriteOutput)?;
    }
    Ok(outcome.value)
}

/// Render `error` followed by every cause not already part of the message.
fn with_causes(error: &dyn std::error::Error) -> String {
    let mut line = error.to_string();
    let mut cause = error.source();
    while let Some(current) = cause {
        let text = current.to_string();
        if !line.ends_with(&text) {
            line.push_str(": ");
            line.push_str(&text);
        }
        cause = current.source();
    }
    line
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    out.write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    out.write_all(b"\n").map_err(CliError::WriteOutput)
}

