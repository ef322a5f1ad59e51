use std::collections::HashMap;

use crate::{
    db::{schema::Catalog, types::Row},
    error::Result,
    storage::Storage,
};

/// In-memory storage backend, used by tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    catalog: Catalog,
    rows: HashMap<String, Vec<Row>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load_catalog(&self) -> Result<Catalog> {
        Ok(self.catalog.clone())
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        self.catalog = catalog.clone();
        Ok(())
    }

    fn load_rows(&self, table_name: &str) -> Result<Vec<Row>> {
        Ok(self.rows.get(table_name).cloned().unwrap_or_default())
    }

    fn save_rows(&mut self, table_name: &str, rows: &[Row]) -> Result<()> {
        self.rows.insert(table_name.to_string(), rows.to_vec());
        Ok(())
    }
}
