//! Builders for fixtures written as `|`-separated strings.
//!
//! ```
//! use sqltypes::testing::{make_test_fields, make_test_result};
//!
//! let fields = make_test_fields("id|name", "int64|varchar").unwrap();
//! let result = make_test_result(fields, &["1|alice", "2|null"]).unwrap();
//! assert_eq!(result.row_count(), 2);
//! assert!(result.rows[1][1].is_null());
//! ```

use std::sync::Arc;

use bytes::Bytes;

use crate::error::SqlTypesError;
use crate::result::QueryResult;
use crate::schema::Field;
use crate::types::ColumnType;
use crate::value::{Row, Value};

/// Cell literal that stands for SQL NULL in [`make_test_result`].
pub const NULL_CELL: &str = "null";

/// Build a schema from `"a|b"` names and `"int64|varchar"` types.
pub fn make_test_fields(names: &str, types: &str) -> Result<Vec<Arc<Field>>, SqlTypesError> {
    let names: Vec<&str> = names.split('|').collect();
    let types: Vec<&str> = types.split('|').collect();
    if names.len() != types.len() {
        return Err(SqlTypesError::InvalidFixture(format!(
            "{} names but {} types",
            names.len(),
            types.len()
        )));
    }

    names
        .into_iter()
        .zip(types)
        .map(|(name, typ)| -> Result<Arc<Field>, SqlTypesError> {
            Ok(Arc::new(Field::new(name, typ.parse()?)))
        })
        .collect()
}

/// Build a result whose rows are `"v1|v2"` strings, one per row.
///
/// Cells go through the checked [`Value::new`], so `"abc"` in an int64
/// column is an error. [`NULL_CELL`] yields NULL. `rows_affected` is set to
/// the number of rows.
pub fn make_test_result(
    fields: Vec<Arc<Field>>,
    rows: &[&str],
) -> Result<QueryResult, SqlTypesError> {
    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let cells: Vec<&str> = line.split('|').collect();
            if cells.len() != fields.len() {
                return Err(SqlTypesError::WidthMismatch {
                    row: i,
                    expected: fields.len(),
                    actual: cells.len(),
                });
            }
            fields
                .iter()
                .zip(cells)
                .map(|(field, cell)| match cell {
                    NULL_CELL => Ok(Value::null()),
                    _ => Value::new(field.field_type, Bytes::copy_from_slice(cell.as_bytes())),
                })
                .collect::<Result<Row, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QueryResult {
        fields: Some(fields),
        rows_affected: rows.len() as u64,
        insert_id: 0,
        rows,
    })
}

/// Trusted value from a string, for expectations in tests.
pub fn test_value(typ: ColumnType, s: &str) -> Value {
    Value::trusted(typ, Bytes::copy_from_slice(s.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_from_strings() {
        let fields = make_test_fields("a|b", "int8|varchar").expect("fields");
        assert_eq!(*fields[0], Field::new("a", ColumnType::Int8));
        assert_eq!(*fields[1], Field::new("b", ColumnType::Varchar));
    }

    #[test]
    fn mismatched_names_and_types() {
        assert!(matches!(
            make_test_fields("a|b", "int8"),
            Err(SqlTypesError::InvalidFixture(_))
        ));
        assert!(matches!(
            make_test_fields("a", "nope"),
            Err(SqlTypesError::UnknownType(_))
        ));
    }

    #[test]
    fn cells_are_checked() {
        let fields = make_test_fields("a", "int64").expect("fields");
        let err = make_test_result(fields, &["x"]).unwrap_err();
        assert!(matches!(err, SqlTypesError::InvalidValue { typ: ColumnType::Int64, .. }));
    }

    #[test]
    fn row_width_must_match() {
        let fields = make_test_fields("a|b", "int64|text").expect("fields");
        assert_eq!(
            make_test_result(fields, &["1|x", "2"]).unwrap_err(),
            SqlTypesError::WidthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }
}
