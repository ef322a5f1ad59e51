use crate::db::types::Row;

use super::Condition;

/// Returns the rows matching the condition, in collection order.
///
/// Without a condition the entire collection is returned as-is. Comparison is
/// always against the text form of the stored value, even for integer and
/// boolean columns. Never mutates the input.
pub fn select(rows: &[Row], condition: Option<&Condition>) -> Vec<Row> {
    match condition {
        None => rows.to_vec(),
        Some(condition) => rows
            .iter()
            .filter(|row| condition.matches(row))
            .cloned()
            .collect(),
    }
}
