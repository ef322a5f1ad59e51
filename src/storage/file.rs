use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    db::{schema::Catalog, types::Row},
    error::Result,
    storage::Storage,
};

/// Catalog file name inside the data directory
pub const META_FILE: &str = "db_meta.json";
/// Subdirectory holding one row file per table
pub const DATA_DIR: &str = "data";

/// JSON-file backed storage
///
/// Layout under the root directory:
///
/// ```text
/// db_meta.json        # the whole catalog, one JSON object
/// data/<table>.json   # one array of row objects per table
/// ```
///
/// Rows serialize field-for-field, so the files stay readable and editable
/// by hand. A missing or corrupt file loads as an empty catalog or row list.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn meta_path(&self) -> PathBuf {
        self.root.join(META_FILE)
    }

    fn rows_path(&self, table_name: &str) -> PathBuf {
        self.root.join(DATA_DIR).join(format!("{}.json", table_name))
    }
}

impl Storage for FileStorage {
    fn load_catalog(&self) -> Result<Catalog> {
        Ok(read_json(&self.meta_path()).unwrap_or_default())
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let text = serde_json::to_string_pretty(catalog)?;
        fs::write(self.meta_path(), text)?;
        Ok(())
    }

    fn load_rows(&self, table_name: &str) -> Result<Vec<Row>> {
        Ok(read_json(&self.rows_path(table_name)).unwrap_or_default())
    }

    fn save_rows(&mut self, table_name: &str, rows: &[Row]) -> Result<()> {
        fs::create_dir_all(self.root.join(DATA_DIR))?;
        let text = serde_json::to_string_pretty(rows)?;
        fs::write(self.rows_path(table_name), text)?;
        Ok(())
    }
}

/// Reads and parses a JSON file; None when the file is missing or corrupt
fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let text = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("ignoring corrupt file {}: {}", path.display(), err);
            None
        }
    }
}
