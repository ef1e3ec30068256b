use std::fmt;

use crate::types::ColumnType;

/// Category of a [`SqlTypesError`]. Lets callers tell bad input data apart
/// from a caller-side contract violation without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed bytes: a wire row or a value that cannot be what it claims.
    Format,
    /// Row width disagrees with the schema it is paired with.
    Schema,
    /// Unknown names in configuration or fixtures.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Format => f.write_str("format"),
            ErrorKind::Schema => f.write_str("schema"),
            ErrorKind::Config => f.write_str("config"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SqlTypesError {
    #[error("invalid {typ} value: {reason}")]
    InvalidValue { typ: ColumnType, reason: String },

    #[error("cannot build a value of type {0}")]
    UnsupportedType(ColumnType),

    #[error("unknown column type '{0}'")]
    UnknownType(String),

    #[error("unknown included-fields policy '{0}'")]
    UnknownPolicy(String),

    #[error("column {column}: invalid length {length}")]
    InvalidLength { column: usize, length: i64 },

    #[error("column {column}: needs {needed} bytes, only {available} left in buffer")]
    BufferOverrun {
        column: usize,
        needed: usize,
        available: usize,
    },

    #[error("wire row has {columns} columns, schema expects {fields}")]
    MissingColumns { fields: usize, columns: usize },

    #[error("row {row} has {actual} values, schema has {expected} fields")]
    WidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("fixture: {0}")]
    InvalidFixture(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<SqlTypesError>,
    },
}

impl SqlTypesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SqlTypesError::InvalidValue { .. }
            | SqlTypesError::UnsupportedType(_)
            | SqlTypesError::InvalidLength { .. }
            | SqlTypesError::BufferOverrun { .. } => ErrorKind::Format,
            SqlTypesError::MissingColumns { .. } | SqlTypesError::WidthMismatch { .. } => {
                ErrorKind::Schema
            }
            SqlTypesError::UnknownType(_)
            | SqlTypesError::UnknownPolicy(_)
            | SqlTypesError::InvalidFixture(_) => ErrorKind::Config,
            SqlTypesError::Context { source, .. } => source.kind(),
        }
    }

    /// Add context to the error, preserving its kind.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        SqlTypesError::Context {
            context: ctx.to_string(),
            source: Box::new(self),
        }
    }
}
