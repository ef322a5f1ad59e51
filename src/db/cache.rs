use std::collections::HashMap;

use crate::db::{engine::Condition, types::Row};

/// Distinguishes full scans from filtered selects in the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectMode {
    All,
    Filtered,
}

/// Key identifying one memoized select result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    mode: SelectMode,
    row_count: usize,
    condition: Option<(String, String)>,
}

impl CacheKey {
    pub fn new(row_count: usize, condition: Option<&Condition>) -> Self {
        match condition {
            None => Self {
                mode: SelectMode::All,
                row_count,
                condition: None,
            },
            Some(condition) => Self {
                mode: SelectMode::Filtered,
                row_count,
                condition: Some((condition.column.clone(), condition.value.clone())),
            },
        }
    }
}

/// Memoizes select results for the lifetime of the process.
///
/// KNOWN GAP, kept from the original design: the key carries the row count
/// but neither the row contents nor the table name, so an update that changes
/// field values without changing the count produces a stale hit, and two
/// tables with matching count and condition share an entry. The cache is
/// unbounded and never invalidated; callers needing fresh data after an
/// update must bypass it.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, Vec<Row>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached rows for the key, computing and storing on a miss
    pub fn get_or_compute(
        &mut self,
        key: CacheKey,
        compute: impl FnOnce() -> Vec<Row>,
    ) -> Vec<Row> {
        self.entries.entry(key).or_insert_with(compute).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
