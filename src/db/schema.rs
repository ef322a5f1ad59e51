use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    db::types::DataType,
    error::{Error, Result},
};

/// Name of the identifier column present in every table
pub const ID_COLUMN: &str = "ID";

/// Column schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub datatype: DataType,
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.datatype)
    }
}

/// Ordered column list for one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// Columns a caller supplies values for: everything after the leading ID
    pub fn value_columns(&self) -> &[Column] {
        self.columns.get(1..).unwrap_or(&[])
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Schema catalog: table name mapped to its column schema
///
/// Iterates in sorted name order. Serializes to a single JSON object keyed by
/// table name.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: BTreeMap<String, TableSchema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    /// Creates a table from `name:type` column specs.
    ///
    /// An `ID:int` column is prepended unless the caller already named a
    /// column `id` (any case). The catalog is untouched on any failure.
    pub fn create_table(&mut self, name: &str, column_specs: &[String]) -> Result<&TableSchema> {
        if self.tables.contains_key(name) {
            return Err(Error::AlreadyExists(name.to_string()));
        }

        if column_specs.is_empty() {
            return Err(Error::Validation(format!(
                "no columns given for table \"{}\"",
                name
            )));
        }

        let mut columns = parse_column_specs(column_specs)?;

        let has_id = columns.iter().any(|c| c.name.eq_ignore_ascii_case(ID_COLUMN));
        if !has_id {
            columns.insert(
                0,
                Column {
                    name: ID_COLUMN.to_string(),
                    datatype: DataType::Integer,
                },
            );
        }

        self.tables
            .insert(name.to_string(), TableSchema { columns });
        Ok(&self.tables[name])
    }

    /// Removes a table entry, returning its schema
    pub fn drop_table(&mut self, name: &str) -> Result<TableSchema> {
        self.tables
            .remove(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Table names in catalog iteration order
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Returns the table schema, or NotFound if the table doesn't exist
    pub fn must_get(&self, name: &str) -> Result<&TableSchema> {
        self.get(name).ok_or_else(|| Error::NotFound(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Parses `name:type` column specs, rejecting blank parts and unknown types
fn parse_column_specs(specs: &[String]) -> Result<Vec<Column>> {
    let mut columns = Vec::with_capacity(specs.len());

    for item in specs {
        let Some((name, type_name)) = item.split_once(':') else {
            return Err(Error::Validation(format!(
                "column spec \"{}\" is not of the form name:type",
                item
            )));
        };

        let name = name.trim();
        let type_name = type_name.trim();
        if name.is_empty() || type_name.is_empty() {
            return Err(Error::Validation(format!(
                "column spec \"{}\" has a blank name or type",
                item
            )));
        }

        let Some(datatype) = DataType::parse(type_name) else {
            return Err(Error::Validation(format!(
                "unsupported type \"{}\" in column spec \"{}\" (supported: int, str, bool)",
                type_name, item
            )));
        };

        columns.push(Column {
            name: name.to_string(),
            datatype,
        });
    }

    Ok(columns)
}
