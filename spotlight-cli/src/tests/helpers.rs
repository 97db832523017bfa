//! Test helpers for writing catalogs into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Four events covering two categories, two types and two venues.
pub(super) const SAMPLE_CATALOG: &str = r#"[
  {"id": 1, "category": "Action", "type": "movie", "location": "Odeon",
   "details": {"title": "Night Heist"}},
  {"id": 2, "category": "Action", "type": "movie", "location": "Odeon",
   "details": {"title": "Rooftop Chase"}},
  {"id": 3, "category": "Music", "type": "concert", "location": "Harbour Hall",
   "details": {"title": "Winter Strings", "featured": "true"}},
  {"id": 4, "category": "Comedy", "type": "comedy", "location": "Harbour Hall",
   "details": {"title": "Open Mic"}}
]"#;

/// A temporary directory holding a catalog file and a profile store.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn with_catalog(contents: &str) -> Self {
        let workspace = Self::new();
        write_utf8(&workspace.catalog(), contents.as_bytes());
        workspace
    }

    pub(super) fn catalog(&self) -> Utf8PathBuf {
        self.root.join("catalog.json")
    }

    pub(super) fn store_dir(&self) -> Utf8PathBuf {
        self.root.join("profiles")
    }

    pub(super) fn store_db(&self) -> Utf8PathBuf {
        self.root.join("profiles.db")
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}
