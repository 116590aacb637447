use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::DataResult;
use super::loader;
use super::model::Table;

/// A loaded table plus the file timestamp it was read at.
#[derive(Debug)]
struct Loaded {
    table: Arc<Table>,
    modified: Option<SystemTime>,
}

/// Lazily loads the indicator table once and hands out shared read-only
/// handles. The file is read again only when its modification time changes
/// or after [`DataSource::invalidate`].
#[derive(Debug)]
pub struct DataSource {
    path: PathBuf,
    loaded: Option<Loaded>,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a table is currently cached.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The table, loading it on first access or when the file changed on disk.
    pub fn table(&mut self) -> DataResult<Arc<Table>> {
        let modified = modified_time(&self.path);

        if let Some(loaded) = &self.loaded {
            if loaded.modified == modified {
                return Ok(Arc::clone(&loaded.table));
            }
            log::info!("{} changed on disk, reloading", self.path.display());
        }

        let table = Arc::new(loader::load(&self.path)?);
        self.loaded = Some(Loaded {
            table: Arc::clone(&table),
            modified,
        });
        Ok(table)
    }

    /// Drop the cached table so the next [`DataSource::table`] call reloads.
    pub fn invalidate(&mut self) {
        self.loaded = None;
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
