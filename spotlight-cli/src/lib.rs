//! Command-line interface for recording signals and requesting
//! recommendations.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use spotlight_core::Signal;

mod catalog;
mod commands;
mod error;
mod store;

pub use error::CliError;
pub use store::StoreError;

use commands::{RecommendArgs, ResetArgs, SignalArgs};

pub(crate) const ARG_ITEM: &str = "item";
pub(crate) const ARG_USER: &str = "user";
pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ARG_STORE_DIR: &str = "store-dir";
pub(crate) const ARG_STORE_DB: &str = "store-db";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_CATEGORY: &str = "category";
pub(crate) const ARG_TYPE: &str = "type";
pub(crate) const ARG_SEARCH: &str = "search";
pub(crate) const ARG_FEATURED: &str = "featured";

pub(crate) const ENV_SIGNAL_ITEM: &str = "SPOTLIGHT_CMDS_SIGNAL_ITEM";
pub(crate) const ENV_SIGNAL_USER: &str = "SPOTLIGHT_CMDS_SIGNAL_USER";
pub(crate) const ENV_SIGNAL_CATALOG: &str = "SPOTLIGHT_CMDS_SIGNAL_CATALOG";
pub(crate) const ENV_RESET_USER: &str = "SPOTLIGHT_CMDS_RESET_USER";
pub(crate) const ENV_RECOMMEND_USER: &str = "SPOTLIGHT_CMDS_RECOMMEND_USER";
pub(crate) const ENV_RECOMMEND_CATALOG: &str = "SPOTLIGHT_CMDS_RECOMMEND_CATALOG";

/// Directory used for the JSON profile store when none is configured.
pub(crate) const DEFAULT_STORE_DIR: &str = ".spotlight/profiles";

/// Run the Spotlight CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] for bad arguments, unreadable catalogs, unknown
/// items or stores that cannot be opened.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    dispatch(cli.command, &mut stdout, &mut stderr)
}

fn dispatch(
    command: Command,
    out: &mut dyn Write,
    warnings: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::View(args) => commands::run_signal_with(args, Signal::View, out, warnings),
        Command::Book(args) => commands::run_signal_with(args, Signal::Booking, out, warnings),
        Command::Reset(args) => commands::run_reset_with(args, warnings),
        Command::Recommend(args) => commands::run_recommend_with(args, out, warnings),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "spotlight",
    about = "Record interest signals and request personalised recommendations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record that the user viewed a catalog item.
    View(SignalArgs),
    /// Record that the user booked a catalog item.
    Book(SignalArgs),
    /// Forget everything learned about the user.
    Reset(ResetArgs),
    /// Recommend catalog items for the user.
    Recommend(RecommendArgs),
}

#[cfg(test)]
mod tests;
