use crate::{
    db::{
        schema::{Catalog, ID_COLUMN},
        types::{Row, Value},
    },
    error::{Error, Result},
};

use super::{Assignment, Condition};

/// Inserts one row built from positional raw values, returning the new ID.
///
/// Values are cast against the schema's columns (minus the leading ID) in
/// order; the first cast failure aborts with the collection untouched, so no
/// partial row is ever appended.
pub fn insert(
    catalog: &Catalog,
    table_name: &str,
    raw_values: &[String],
    rows: &mut Vec<Row>,
) -> Result<i64> {
    let schema = catalog.must_get(table_name)?;
    let columns = schema.value_columns();

    if raw_values.len() != columns.len() {
        return Err(Error::Validation(format!(
            "table \"{}\" expects {} values, got {}",
            table_name,
            columns.len(),
            raw_values.len()
        )));
    }

    let mut row = Row::new();
    for (column, raw) in columns.iter().zip(raw_values) {
        row.insert(column.name.clone(), Value::cast(raw, column.datatype)?);
    }

    let id = next_id(rows);
    row.insert(ID_COLUMN.to_string(), Value::Integer(id));
    rows.push(row);

    Ok(id)
}

/// Next identifier continues from the last row in append order.
///
/// This is deliberately not a max over all IDs: the collection is assumed to
/// stay append-ordered, and reordering it externally breaks monotonicity.
fn next_id(rows: &[Row]) -> i64 {
    match rows.last().and_then(|row| row.get(ID_COLUMN)) {
        Some(Value::Integer(last)) => last + 1,
        _ => 1,
    }
}

/// Applies the assignment to every row matching the condition, in place.
///
/// The new value is stored verbatim as text; it is not re-cast against the
/// declared column type, so an updated cell keeps whatever the caller
/// supplied. Returns the number of rows touched.
pub fn update(rows: &mut [Row], assignment: &Assignment, condition: &Condition) -> usize {
    let mut count = 0;
    for row in rows.iter_mut() {
        if condition.matches(row) {
            row.insert(
                assignment.column.clone(),
                Value::Text(assignment.value.clone()),
            );
            count += 1;
        }
    }
    count
}

/// Returns the rows that survive the condition plus the removed count
pub fn delete(rows: Vec<Row>, condition: &Condition) -> (Vec<Row>, usize) {
    let total = rows.len();
    let kept: Vec<Row> = rows
        .into_iter()
        .filter(|row| !condition.matches(row))
        .collect();
    let removed = total - kept.len();
    (kept, removed)
}
