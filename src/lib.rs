//! flatdb - a minimal file-backed tabular data store
//!
//! This crate provides a small single-process database with:
//! - A schema catalog (create/drop/list tables with typed columns)
//! - CRUD over in-memory row collections loaded per operation
//! - Memoized select results
//! - Pluggable storage backends (JSON files, in-memory)

pub mod db;
pub mod error;
pub mod storage;
