use crate::{db::schema::Catalog, db::types::Row, error::Result};

pub mod file;
pub mod memory;

/// Abstract storage interface for the catalog and per-table row collections
///
/// Different from the engine in `db`, which never touches storage: the
/// session loads through this trait, transforms in memory, and saves back.
/// Loaders return empty structures when the backing data is missing or
/// unreadable; only writes surface errors.
pub trait Storage {
    fn load_catalog(&self) -> Result<Catalog>;
    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()>;
    fn load_rows(&self, table_name: &str) -> Result<Vec<Row>>;
    fn save_rows(&mut self, table_name: &str, rows: &[Row]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::{Storage, memory::MemoryStorage};
    use crate::{
        db::{schema::Catalog, types::{Row, Value}},
        error::Result,
    };

    fn sample_row(id: i64) -> Row {
        let mut row = Row::new();
        row.insert("ID".to_string(), Value::Integer(id));
        row.insert("name".to_string(), Value::Text("Alice".to_string()));
        row
    }

    fn test_catalog_roundtrip(mut storage: impl Storage) -> Result<()> {
        assert!(storage.load_catalog()?.is_empty());

        let mut catalog = Catalog::new();
        catalog.create_table("users", &["name:str".to_string()])?;
        storage.save_catalog(&catalog)?;

        assert_eq!(storage.load_catalog()?, catalog);
        Ok(())
    }

    fn test_rows_roundtrip(mut storage: impl Storage) -> Result<()> {
        assert!(storage.load_rows("users")?.is_empty());

        let rows = vec![sample_row(1), sample_row(2)];
        storage.save_rows("users", &rows)?;
        assert_eq!(storage.load_rows("users")?, rows);

        // Other tables stay independent
        assert!(storage.load_rows("posts")?.is_empty());

        storage.save_rows("users", &[])?;
        assert!(storage.load_rows("users")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_memory() -> Result<()> {
        test_catalog_roundtrip(MemoryStorage::new())?;
        test_rows_roundtrip(MemoryStorage::new())?;
        Ok(())
    }
}
