use crate::{
    db::{
        cache::{CacheKey, QueryCache},
        command::Command,
        engine::{self, ResultSet},
    },
    error::Result,
    storage::Storage,
};

/// Executes parsed commands against a storage backend.
///
/// Each operation loads the catalog and the affected table's rows fresh,
/// runs one engine or catalog transform, and saves the results back; nothing
/// is held between operations except the select cache, which lives as long
/// as the session. Confirmation of destructive commands is the caller's job:
/// a cancelled command is simply never passed in.
pub struct Session<S: Storage> {
    storage: S,
    cache: QueryCache,
}

impl<S: Storage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            cache: QueryCache::new(),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<ResultSet> {
        match command {
            Command::CreateTable { name, columns } => {
                let mut catalog = self.storage.load_catalog()?;
                let created = catalog.create_table(&name, &columns)?.columns.clone();
                self.storage.save_catalog(&catalog)?;
                Ok(ResultSet::CreateTable {
                    table_name: name,
                    columns: created,
                })
            }
            Command::DropTable { name } => {
                let mut catalog = self.storage.load_catalog()?;
                catalog.drop_table(&name)?;
                self.storage.save_catalog(&catalog)?;
                // Clear the data file too, so a later table of the same name
                // does not resurrect old rows.
                self.storage.save_rows(&name, &[])?;
                Ok(ResultSet::DropTable { table_name: name })
            }
            Command::ListTables => {
                let catalog = self.storage.load_catalog()?;
                Ok(ResultSet::ListTables {
                    names: catalog.table_names(),
                })
            }
            Command::Insert { table, values } => {
                let catalog = self.storage.load_catalog()?;
                let mut rows = self.storage.load_rows(&table)?;
                let id = engine::insert(&catalog, &table, &values, &mut rows)?;
                self.storage.save_rows(&table, &rows)?;
                Ok(ResultSet::Insert {
                    table_name: table,
                    id,
                })
            }
            Command::Select { table, condition } => {
                let catalog = self.storage.load_catalog()?;
                let columns = catalog.must_get(&table)?.column_names();
                let rows = self.storage.load_rows(&table)?;

                let key = CacheKey::new(rows.len(), condition.as_ref());
                let result = self
                    .cache
                    .get_or_compute(key, || engine::select(&rows, condition.as_ref()));

                Ok(ResultSet::Select {
                    columns,
                    rows: result,
                })
            }
            Command::Update {
                table,
                assignment,
                condition,
            } => {
                let catalog = self.storage.load_catalog()?;
                catalog.must_get(&table)?;
                let mut rows = self.storage.load_rows(&table)?;
                let count = engine::update(&mut rows, &assignment, &condition);
                self.storage.save_rows(&table, &rows)?;
                Ok(ResultSet::Update { count })
            }
            Command::Delete { table, condition } => {
                let catalog = self.storage.load_catalog()?;
                catalog.must_get(&table)?;
                let rows = self.storage.load_rows(&table)?;
                let (kept, count) = engine::delete(rows, &condition);
                self.storage.save_rows(&table, &kept)?;
                Ok(ResultSet::Delete { count })
            }
            Command::Info { table } => {
                let catalog = self.storage.load_catalog()?;
                let columns = catalog.must_get(&table)?.columns.clone();
                Ok(ResultSet::Info {
                    table_name: table,
                    columns,
                })
            }
            Command::Help => Ok(ResultSet::Help),
            Command::Exit => Ok(ResultSet::Exit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::{
        db::{
            command::Command,
            engine::ResultSet,
            types::Value,
        },
        error::{Error, Result},
        storage::memory::MemoryStorage,
    };

    fn run(session: &mut Session<MemoryStorage>, line: &str) -> Result<ResultSet> {
        session.execute(Command::parse(line)?)
    }

    #[test]
    fn test_users_scenario_end_to_end() -> Result<()> {
        let mut session = Session::new(MemoryStorage::new());

        let created = run(&mut session, "create_table users name:str age:int")?;
        match created {
            ResultSet::CreateTable { table_name, columns } => {
                assert_eq!(table_name, "users");
                assert_eq!(
                    columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                    vec!["ID", "name", "age"]
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert_eq!(
            run(&mut session, "insert into users values (\"Alice\", 30)")?,
            ResultSet::Insert {
                table_name: "users".to_string(),
                id: 1
            }
        );
        assert_eq!(
            run(&mut session, "insert into users values (\"Bob\", 25)")?,
            ResultSet::Insert {
                table_name: "users".to_string(),
                id: 2
            }
        );

        match run(&mut session, "select from users")? {
            ResultSet::Select { columns, rows } => {
                assert_eq!(columns, vec!["ID", "name", "age"]);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].get("name"), Some(&Value::Text("Alice".into())));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        match run(&mut session, "select from users where age = 30")? {
            ResultSet::Select { rows, .. } => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].get("ID"), Some(&Value::Integer(1)));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert_eq!(
            run(&mut session, "delete from users where age = 25")?,
            ResultSet::Delete { count: 1 }
        );

        // Row count changed, so the select is recomputed rather than served
        // from the earlier cached result.
        match run(&mut session, "select from users")? {
            ResultSet::Select { rows, .. } => assert_eq!(rows.len(), 1),
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_select_after_update_serves_stale_cache_entry() -> Result<()> {
        // Exercises the documented cache gap: an update that keeps the row
        // count stable does not invalidate previously cached selects.
        let mut session = Session::new(MemoryStorage::new());
        run(&mut session, "create_table users name:str age:int")?;
        run(&mut session, "insert into users values (\"Alice\", 30)")?;
        run(&mut session, "insert into users values (\"Bob\", 25)")?;

        let before = run(&mut session, "select from users where age = 30")?;
        assert_eq!(
            run(&mut session, "update users set age = 31 where age = 30")?,
            ResultSet::Update { count: 1 }
        );
        let after = run(&mut session, "select from users where age = 30")?;

        // Stale: the updated row no longer has age 30, yet the cached result
        // still reports it.
        assert_eq!(after, before);
        match after {
            ResultSet::Select { rows, .. } => assert_eq!(rows.len(), 1),
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_update_is_persisted_even_when_cache_is_stale() -> Result<()> {
        let mut session = Session::new(MemoryStorage::new());
        run(&mut session, "create_table users name:str age:int")?;
        run(&mut session, "insert into users values (\"Alice\", 30)")?;

        run(&mut session, "update users set age = 31 where name = Alice")?;

        // A select with a fresh key sees the stored value
        match run(&mut session, "select from users where name = Alice")? {
            ResultSet::Select { rows, .. } => {
                assert_eq!(rows[0].get("age"), Some(&Value::Text("31".into())));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_drop_table_clears_rows() -> Result<()> {
        let mut session = Session::new(MemoryStorage::new());
        run(&mut session, "create_table users name:str age:int")?;
        run(&mut session, "insert into users values (\"Alice\", 30)")?;

        assert_eq!(
            run(&mut session, "drop_table users")?,
            ResultSet::DropTable {
                table_name: "users".to_string()
            }
        );
        assert_eq!(
            run(&mut session, "select from users"),
            Err(Error::NotFound("users".to_string()))
        );

        // Recreating the table starts from an empty collection
        run(&mut session, "create_table users name:str age:int")?;
        match run(&mut session, "select from users")? {
            ResultSet::Select { rows, .. } => assert!(rows.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_operations_on_missing_table_fail_not_found() -> Result<()> {
        let mut session = Session::new(MemoryStorage::new());
        let not_found = Err(Error::NotFound("ghosts".to_string()));

        assert_eq!(
            run(&mut session, "insert into ghosts values (1)"),
            not_found
        );
        assert_eq!(run(&mut session, "select from ghosts"), not_found);
        assert_eq!(
            run(&mut session, "update ghosts set a = 1 where ID = 1"),
            not_found
        );
        assert_eq!(
            run(&mut session, "delete from ghosts where ID = 1"),
            not_found
        );
        assert_eq!(run(&mut session, "drop_table ghosts"), not_found);
        assert_eq!(run(&mut session, "info ghosts"), not_found);
        Ok(())
    }

    #[test]
    fn test_list_tables_and_info() -> Result<()> {
        let mut session = Session::new(MemoryStorage::new());
        assert_eq!(
            run(&mut session, "list_tables")?,
            ResultSet::ListTables { names: vec![] }
        );

        run(&mut session, "create_table users name:str")?;
        run(&mut session, "create_table posts title:str")?;
        assert_eq!(
            run(&mut session, "list_tables")?,
            ResultSet::ListTables {
                names: vec!["posts".to_string(), "users".to_string()]
            }
        );

        match run(&mut session, "info users")? {
            ResultSet::Info { table_name, columns } => {
                assert_eq!(table_name, "users");
                assert_eq!(
                    columns.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    vec!["ID:int", "name:str"]
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_failed_insert_persists_nothing() -> Result<()> {
        let mut session = Session::new(MemoryStorage::new());
        run(&mut session, "create_table users name:str age:int")?;

        let err = run(&mut session, "insert into users values (\"Alice\", old)");
        assert!(matches!(err, Err(Error::TypeCast { .. })));

        match run(&mut session, "select from users")? {
            ResultSet::Select { rows, .. } => assert!(rows.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }
}
