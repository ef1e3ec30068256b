use serde::{Deserialize, Serialize};

use crate::error::SqlTypesError;
use crate::types::ColumnType;

/// Column metadata, one per column of a result.
///
/// Results hold fields behind `Arc` so several results can share one schema.
/// Only `field_type` drives decoding; the rest is display metadata that a
/// client may or may not ask for (see [`IncludedFields`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: ColumnType,
    pub table: String,
    pub org_table: String,
    pub database: String,
    pub org_name: String,
    pub column_length: u32,
    pub charset: u32,
    pub decimals: u32,
    pub flags: u32,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            field_type,
            ..Self::default()
        }
    }

    /// Shortcut: anonymous field carrying only a type.
    pub fn typed(field_type: ColumnType) -> Self {
        Self {
            field_type,
            ..Self::default()
        }
    }

    /// A new field holding only the attributes `policy` keeps.
    pub fn stripped(&self, policy: IncludedFields) -> Self {
        match policy {
            IncludedFields::All => self.clone(),
            IncludedFields::TypeAndName => Self::new(self.name.clone(), self.field_type),
            IncludedFields::TypeOnly => Self::typed(self.field_type),
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Included Fields
// ════════════════════════════════════════════════════════════════

/// How much column metadata survives [`strip_metadata`](crate::QueryResult::strip_metadata).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludedFields {
    /// Keep only the column type.
    TypeOnly,
    /// Keep the column type and name.
    #[default]
    TypeAndName,
    /// Keep everything; stripping is a no-op.
    All,
}

impl std::fmt::Display for IncludedFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncludedFields::TypeOnly => f.write_str("type_only"),
            IncludedFields::TypeAndName => f.write_str("type_and_name"),
            IncludedFields::All => f.write_str("all"),
        }
    }
}

impl std::str::FromStr for IncludedFields {
    type Err = SqlTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "type_only" => Ok(IncludedFields::TypeOnly),
            "type_and_name" => Ok(IncludedFields::TypeAndName),
            "all" => Ok(IncludedFields::All),
            _ => Err(SqlTypesError::UnknownPolicy(s.to_string())),
        }
    }
}
