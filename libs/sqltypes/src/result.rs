use std::borrow::{Borrow, Cow};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SqlTypesError;
use crate::schema::{Field, IncludedFields};
use crate::value::Row;
use crate::wire::{WireRow, decode_rows};

/// The full output of one query: schema, rows and execution counters.
///
/// `fields` is `None` for schema-less results (DML without a result set)
/// and may also be an explicit empty schema; the two are kept distinct.
///
/// Fields are shared through `Arc`: `Clone` hands out a result that points
/// at the same `Field`s, [`deep_copy`](Self::deep_copy) never does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub fields: Option<Vec<Arc<Field>>>,
    #[serde(default)]
    pub rows_affected: u64,
    #[serde(default)]
    pub insert_id: u64,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Assemble a result from wire rows decoded against `fields`.
    pub fn from_wire(
        fields: Vec<Arc<Field>>,
        rows: &[WireRow],
        rows_affected: u64,
        insert_id: u64,
    ) -> Result<Self, SqlTypesError> {
        let rows = decode_rows(&fields, rows)?;
        Ok(Self {
            fields: Some(fields),
            rows_affected,
            insert_id,
            rows,
        })
    }

    pub fn to_wire_rows(&self) -> Vec<WireRow> {
        self.rows.iter().map(|row| WireRow::encode(row)).collect()
    }

    /// Number of fields in the schema (0 when there is none).
    pub fn column_count(&self) -> usize {
        self.fields.as_ref().map_or(0, Vec::len)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Structural schema comparison; `None` and an empty schema are equal.
    pub fn fields_equal(&self, other: &QueryResult) -> bool {
        let lhs = self.fields.as_deref().unwrap_or_default();
        let rhs = other.fields.as_deref().unwrap_or_default();
        lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(a, b)| **a == **b)
    }

    /// Retag every value with the type of its column in `fields`.
    ///
    /// Used when rows were decoded against a placeholder schema (everything as
    /// varbinary, say) and the real one arrives later. NULL values stay NULL
    /// whatever the column type. Other values keep their raw bytes, except
    /// under a `Null`-typed column where they become NULL and the bytes are
    /// dropped. `self.fields` is left alone. Every row must be exactly `fields.len()`
    /// wide: the check runs over all rows before any value is touched, so a
    /// failed repair leaves the result as it was.
    pub fn repair<F: Borrow<Field>>(&mut self, fields: &[F]) -> Result<(), SqlTypesError> {
        if let Some((row, actual)) = self
            .rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, width)| width != fields.len())
        {
            return Err(SqlTypesError::WidthMismatch {
                row,
                expected: fields.len(),
                actual,
            });
        }

        for row in &mut self.rows {
            for (value, field) in row.iter_mut().zip(fields) {
                if value.is_null() {
                    continue;
                }
                *value = value.retyped(<F as Borrow<Field>>::borrow(field).field_type);
            }
        }
        tracing::debug!(rows = self.rows.len(), columns = fields.len(), "repaired value types");
        Ok(())
    }

    /// Fully independent duplicate: new `Field`s, new value buffers.
    pub fn deep_copy(&self) -> QueryResult {
        QueryResult {
            fields: self
                .fields
                .as_ref()
                .map(|fields| fields.iter().map(|f| Arc::new(Field::clone(f))).collect()),
            rows_affected: self.rows_affected,
            insert_id: self.insert_id,
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|v| v.deep_copy()).collect())
                .collect(),
        }
    }

    /// Keep only the first `n` columns.
    ///
    /// `n == 0` or `n >= column_count()` leaves nothing to cut and borrows
    /// `self` back unchanged. Otherwise the returned result has `n` fields and
    /// every row cut to `n` values; counters and row order are untouched.
    pub fn truncate(&self, n: usize) -> Cow<'_, QueryResult> {
        if n == 0 || n >= self.column_count() {
            return Cow::Borrowed(self);
        }

        Cow::Owned(QueryResult {
            fields: self.fields.as_ref().map(|fields| fields[..n].to_vec()),
            rows_affected: self.rows_affected,
            insert_id: self.insert_id,
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().take(n).cloned().collect())
                .collect(),
        })
    }

    /// Drop the column metadata `policy` does not ask for.
    ///
    /// With [`IncludedFields::All`], or with no fields at all, this borrows
    /// `self` back and the returned fields are the very same `Arc`s. Any
    /// other policy builds brand-new `Field`s; `self` is never modified.
    pub fn strip_metadata(&self, policy: IncludedFields) -> Cow<'_, QueryResult> {
        let fields = match &self.fields {
            Some(fields) if !fields.is_empty() && policy != IncludedFields::All => fields,
            _ => return Cow::Borrowed(self),
        };

        Cow::Owned(QueryResult {
            fields: Some(fields.iter().map(|f| Arc::new(f.stripped(policy))).collect()),
            rows_affected: self.rows_affected,
            insert_id: self.insert_id,
            rows: self.rows.clone(),
        })
    }

    /// Append `src`'s rows after this result's rows.
    ///
    /// `rows_affected` becomes the sum of both; `insert_id` is replaced by
    /// `src.insert_id`. The schema of `self` is kept as is: both results are
    /// expected to share one.
    pub fn append_result(&mut self, src: QueryResult) {
        if self.column_count() > 0 && src.column_count() > 0 && !self.fields_equal(&src) {
            tracing::warn!(
                dst_columns = self.column_count(),
                src_columns = src.column_count(),
                "appending result with a different schema, keeping the existing one"
            );
        }

        self.rows_affected = self.rows_affected.saturating_add(src.rows_affected);
        self.insert_id = src.insert_id;
        self.rows.extend(src.rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;
    use crate::value::Value;

    fn sample() -> QueryResult {
        QueryResult {
            fields: Some(vec![
                Arc::new(Field::typed(ColumnType::Int64)),
                Arc::new(Field::typed(ColumnType::Varchar)),
            ]),
            rows_affected: 2,
            insert_id: 1,
            rows: vec![
                vec![Value::int64(1), Value::null()],
                vec![Value::int64(2), Value::varchar("b")],
            ],
        }
    }

    #[test]
    fn repair_rejects_wrong_width_and_leaves_rows_alone() {
        let mut result = sample();
        result.rows.push(vec![Value::varbinary(b"3")]);
        let before = result.clone();

        let err = result
            .repair(&[Field::typed(ColumnType::Int64), Field::typed(ColumnType::Text)])
            .unwrap_err();

        assert_eq!(
            err,
            SqlTypesError::WidthMismatch {
                row: 2,
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(result, before);
    }

    #[test]
    fn repair_retags_empty_spans() {
        let mut result = QueryResult {
            rows: vec![vec![Value::varbinary(b"")]],
            ..Default::default()
        };
        result.repair(&[Field::typed(ColumnType::Text)]).expect("repair");
        assert_eq!(result.rows[0][0], Value::trusted(ColumnType::Text, &b""[..]));
    }

    #[test]
    fn repair_into_null_column_drops_bytes() {
        let mut result = QueryResult {
            rows: vec![vec![Value::varbinary(b"x")]],
            ..Default::default()
        };
        result.repair(&[Field::typed(ColumnType::Null)]).expect("repair");
        assert_eq!(result.rows[0][0], Value::null());
        assert!(result.rows[0][0].raw().is_empty());
    }

    #[test]
    fn clone_shares_fields_deep_copy_does_not() {
        let result = sample();
        let shallow = result.clone();
        let deep = result.deep_copy();

        let original = result.fields.as_ref().expect("fields");
        let shallow_fields = shallow.fields.as_ref().expect("fields");
        let deep_fields = deep.fields.as_ref().expect("fields");
        assert!(Arc::ptr_eq(&original[0], &shallow_fields[0]));
        assert!(!Arc::ptr_eq(&original[0], &deep_fields[0]));
        assert_eq!(deep, result);
    }

    #[test]
    fn truncate_without_fields_is_noop() {
        let result = QueryResult {
            rows: vec![vec![Value::int64(1), Value::int64(2)]],
            ..Default::default()
        };
        assert!(matches!(result.truncate(1), Cow::Borrowed(_)));
    }

    #[test]
    fn truncate_short_rows_do_not_panic() {
        let mut result = sample();
        result.fields.as_mut().expect("fields").push(Arc::new(Field::typed(ColumnType::Json)));
        result.rows.push(vec![Value::int64(3)]);

        let out = result.truncate(2);
        assert_eq!(out.column_count(), 2);
        assert_eq!(out.rows[2], vec![Value::int64(3)]);
    }

    #[test]
    fn strip_empty_schema_is_borrowed() {
        let result = QueryResult {
            fields: Some(Vec::new()),
            ..Default::default()
        };
        let out = result.strip_metadata(IncludedFields::TypeOnly);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.fields, Some(Vec::new()));
    }

    #[test]
    fn fields_equal_ignores_sharing() {
        let a = sample();
        let b = a.deep_copy();
        assert!(a.fields_equal(&b));
        assert!(QueryResult::default().fields_equal(&QueryResult {
            fields: Some(Vec::new()),
            ..Default::default()
        }));
        assert!(!a.fields_equal(&QueryResult::default()));
    }

    #[test]
    fn append_saturates_rows_affected() {
        let mut dst = QueryResult {
            rows_affected: u64::MAX - 1,
            ..Default::default()
        };
        dst.append_result(QueryResult {
            rows_affected: 5,
            insert_id: 0,
            ..Default::default()
        });
        assert_eq!(dst.rows_affected, u64::MAX);
        assert_eq!(dst.insert_id, 0);
    }

    #[test]
    fn wire_round_trip_through_result() {
        let result = sample();
        let fields = result.fields.clone().expect("fields");
        let rebuilt = QueryResult::from_wire(fields, &result.to_wire_rows(), 2, 1).expect("decode");
        assert_eq!(rebuilt, result);
    }
}
