//! Data store modules
//!
//! This module provides:
//! - `types`: column data types, typed values, value coercion
//! - `schema`: table and column schema definitions, the catalog
//! - `engine`: CRUD operations over loaded row collections
//! - `cache`: memoized select results
//! - `command`: user command grammar and parsing
//! - `session`: the storage-engine-storage pipeline

pub mod cache;
pub mod command;
pub mod engine;
pub mod schema;
pub mod session;
pub mod types;
