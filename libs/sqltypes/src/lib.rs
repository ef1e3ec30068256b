//! In-memory query results: typed values, column metadata, the wire row
//! decoder, and the transformations applied to whole results before they
//! go back to a client.
pub mod error;
pub mod result;
pub mod schema;
pub mod testing;
pub mod types;
pub mod value;
pub mod wire;

pub use error::{ErrorKind, SqlTypesError};
pub use result::QueryResult;
pub use schema::{Field, IncludedFields};
pub use types::ColumnType;
pub use value::{Row, Value};
pub use wire::{NULL_LENGTH, WireRow, decode_row, decode_rows};
