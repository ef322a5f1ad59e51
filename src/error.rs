use std::fmt::Display;

use crate::db::types::DataType;

/// Custom Result type for flatdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for flatdb
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed input: column spec, clause, or value count
    Validation(String),
    /// Table already present in the catalog
    AlreadyExists(String),
    /// Table missing from the catalog
    NotFound(String),
    /// Raw value does not match the declared column type
    TypeCast { value: String, datatype: DataType },
    /// Backing storage could not be written or read
    Storage(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Storage(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Storage(value.to_string())
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "invalid input: {}", msg),
            Error::AlreadyExists(table) => write!(f, "table \"{}\" already exists", table),
            Error::NotFound(table) => write!(f, "table \"{}\" does not exist", table),
            Error::TypeCast { value, datatype } => {
                write!(f, "value \"{}\" is not a valid {}", value, datatype)
            }
            Error::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}
