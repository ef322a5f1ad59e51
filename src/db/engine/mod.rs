//! CRUD operations over already-loaded row collections.
//!
//! Every operation here is a pure transform: the caller loads the catalog and
//! rows, invokes one operation, and persists the result. Nothing in this
//! module performs I/O.

use crate::db::{schema::Column, types::Row};

mod mutation;
mod query;

pub use mutation::{delete, insert, update};
pub use query::select;

/// Single column-equals-value predicate.
///
/// Exactly one condition per operation is supported; this type makes that
/// limit part of the contract rather than a side effect of map iteration.
/// The value is kept as raw text and compared against the text form of the
/// stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub value: String,
}

impl Condition {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Text-equality match; a condition on an unknown column matches nothing
    pub fn matches(&self, row: &Row) -> bool {
        row.get(&self.column)
            .map(|value| value.to_string() == self.value)
            .unwrap_or(false)
    }
}

/// Single `column = value` set clause, value kept as raw text
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: String,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Execution result reported back to the caller
#[derive(Debug, PartialEq)]
pub enum ResultSet {
    CreateTable {
        table_name: String,
        columns: Vec<Column>,
    },
    DropTable {
        table_name: String,
    },
    ListTables {
        names: Vec<String>,
    },
    Insert {
        table_name: String,
        id: i64,
    },
    Select {
        columns: Vec<String>,
        rows: Vec<Row>,
    },
    Update {
        count: usize,
    },
    Delete {
        count: usize,
    },
    Info {
        table_name: String,
        columns: Vec<Column>,
    },
    Help,
    Exit,
}

#[cfg(test)]
pub(crate) fn row(pairs: &[(&str, crate::db::types::Value)]) -> Row {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
