use std::borrow::Borrow;

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::SqlTypesError;
use crate::schema::Field;
use crate::value::{Row, Value};

/// Length sentinel marking an SQL NULL column. A NULL takes no bytes in the buffer.
pub const NULL_LENGTH: i64 = -1;

/// One row as it travels on the wire.
///
/// `lengths` holds one entry per column: [`NULL_LENGTH`] or the byte length
/// of that column's encoding. `values` is every non-NULL encoding
/// concatenated in column order, with no padding or separators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRow {
    pub lengths: Vec<i64>,
    pub values: Bytes,
}

impl WireRow {
    pub fn new(lengths: Vec<i64>, values: impl Into<Bytes>) -> Self {
        Self {
            lengths,
            values: values.into(),
        }
    }

    /// Encode a row of values. Inverse of [`decode_row`] for a matching schema.
    pub fn encode(values: &[Value]) -> Self {
        let total = values.iter().map(Value::len).sum();
        let mut buf = BytesMut::with_capacity(total);
        let mut lengths = Vec::with_capacity(values.len());

        for value in values {
            if value.is_null() {
                lengths.push(NULL_LENGTH);
                continue;
            }
            lengths.push(value.len() as i64);
            buf.extend_from_slice(value.raw());
        }

        Self {
            lengths,
            values: buf.freeze(),
        }
    }
}

/// Decode a wire row into values tagged with the schema's column types.
///
/// Values are zero-copy slices of `row.values`. A wire row wider than the
/// schema (a column added while the query was in flight) decodes to the
/// first `fields.len()` columns: the trailing spans are still consumed so
/// the cursor stays correct, but no value is produced for them. The
/// result therefore always has exactly `fields.len()` values.
///
/// Never panics. Errors on:
/// - fewer wire columns than fields ([`SqlTypesError::MissingColumns`]);
/// - a negative length other than [`NULL_LENGTH`];
/// - a length running past the end of the buffer.
///
/// Bytes left over after the last column are ignored.
pub fn decode_row<F: Borrow<Field>>(fields: &[F], row: &WireRow) -> Result<Row, SqlTypesError> {
    let values = decode_columns(fields, row)?;
    if row.lengths.len() > fields.len() {
        tracing::debug!(
            declared = row.lengths.len(),
            known = fields.len(),
            "dropping wire columns not present in schema"
        );
    }
    Ok(values)
}

/// Decode a batch of wire rows against one schema, stopping at the first bad row.
///
/// Rows wider than the schema are reported in a single debug event for the
/// whole batch.
pub fn decode_rows<F: Borrow<Field>>(
    fields: &[F],
    rows: &[WireRow],
) -> Result<Vec<Row>, SqlTypesError> {
    let decoded = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            decode_columns(fields, row).map_err(|e| e.with_context(format!("row {i}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let wider = rows.iter().filter(|row| row.lengths.len() > fields.len()).count();
    if wider > 0 {
        tracing::debug!(
            rows = wider,
            known = fields.len(),
            "dropping wire columns not present in schema"
        );
    }
    Ok(decoded)
}

fn decode_columns<F: Borrow<Field>>(fields: &[F], row: &WireRow) -> Result<Row, SqlTypesError> {
    if row.lengths.len() < fields.len() {
        return Err(SqlTypesError::MissingColumns {
            fields: fields.len(),
            columns: row.lengths.len(),
        });
    }

    let mut values = Vec::with_capacity(fields.len());
    let mut offset = 0usize;

    for (i, &length) in row.lengths.iter().enumerate() {
        let field = fields.get(i).map(<F as Borrow<Field>>::borrow);

        if length == NULL_LENGTH {
            if field.is_some() {
                values.push(Value::null());
            }
            continue;
        }

        let len = usize::try_from(length)
            .map_err(|_| SqlTypesError::InvalidLength { column: i, length })?;
        let available = row.values.len() - offset;
        if len > available {
            return Err(SqlTypesError::BufferOverrun {
                column: i,
                needed: len,
                available,
            });
        }

        let end = offset + len;
        if let Some(field) = field {
            values.push(Value::trusted(field.field_type, row.values.slice(offset..end)));
        }
        offset = end;
    }

    Ok(values)
}
