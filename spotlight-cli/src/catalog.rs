//! Loading the candidate catalog from a JSON file.

use std::collections::HashSet;

use camino::Utf8Path;
use spotlight_core::{CandidateItem, CandidateSource, ItemId, MemoryCatalog};

use crate::CliError;

/// Read a JSON array of items, rejecting duplicate ids.
pub(crate) fn load_catalog(path: &Utf8Path) -> Result<MemoryCatalog, CliError> {
    let payload = spotlight_fs::read_to_string(path).map_err(|source| CliError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    let items: Vec<CandidateItem> =
        serde_json::from_str(&payload).map_err(|source| CliError::ParseCatalog {
            path: path.to_path_buf(),
            source,
        })?;

    let mut seen = HashSet::with_capacity(items.len());
    if let Some(duplicate) = items.iter().find(|item| !seen.insert(item.id)) {
        return Err(CliError::DuplicateItem {
            path: path.to_path_buf(),
            id: duplicate.id,
        });
    }
    log::debug!("loaded {} catalog items from {path}", items.len());
    Ok(MemoryCatalog::with_items(items))
}

/// Look up `id`, reporting the catalog path when it is missing.
pub(crate) fn require_item(
    catalog: &MemoryCatalog,
    path: &Utf8Path,
    id: ItemId,
) -> Result<CandidateItem, CliError> {
    catalog.find(id).ok_or_else(|| CliError::UnknownItem {
        path: path.to_path_buf(),
        id,
    })
}
