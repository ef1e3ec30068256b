use serde::{Deserialize, Serialize};

use crate::error::SqlTypesError;

// ════════════════════════════════════════════════════════════════
//  Column Type
// ════════════════════════════════════════════════════════════════

/// Type tag attached to every column and every value.
///
/// Mirrors the MySQL protocol type system. The tag only says how the raw
/// bytes of a value are meant to be read; this crate never interprets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// SQL NULL. Values of this type always carry an empty byte span.
    #[default]
    Null,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int24,
    Uint24,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    Timestamp,
    Date,
    Time,
    Datetime,
    Year,
    Decimal,
    Text,
    Blob,
    Varchar,
    Varbinary,
    Char,
    Binary,
    Bit,
    Enum,
    Set,
    /// Only meaningful in bind variables; never a column type.
    Tuple,
    Geometry,
    Json,
    /// An SQL expression passed through verbatim.
    Expression,
}

impl ColumnType {
    pub const ALL: [ColumnType; 32] = [
        ColumnType::Null,
        ColumnType::Int8,
        ColumnType::Uint8,
        ColumnType::Int16,
        ColumnType::Uint16,
        ColumnType::Int24,
        ColumnType::Uint24,
        ColumnType::Int32,
        ColumnType::Uint32,
        ColumnType::Int64,
        ColumnType::Uint64,
        ColumnType::Float32,
        ColumnType::Float64,
        ColumnType::Timestamp,
        ColumnType::Date,
        ColumnType::Time,
        ColumnType::Datetime,
        ColumnType::Year,
        ColumnType::Decimal,
        ColumnType::Text,
        ColumnType::Blob,
        ColumnType::Varchar,
        ColumnType::Varbinary,
        ColumnType::Char,
        ColumnType::Binary,
        ColumnType::Bit,
        ColumnType::Enum,
        ColumnType::Set,
        ColumnType::Tuple,
        ColumnType::Geometry,
        ColumnType::Json,
        ColumnType::Expression,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Null => "null",
            ColumnType::Int8 => "int8",
            ColumnType::Uint8 => "uint8",
            ColumnType::Int16 => "int16",
            ColumnType::Uint16 => "uint16",
            ColumnType::Int24 => "int24",
            ColumnType::Uint24 => "uint24",
            ColumnType::Int32 => "int32",
            ColumnType::Uint32 => "uint32",
            ColumnType::Int64 => "int64",
            ColumnType::Uint64 => "uint64",
            ColumnType::Float32 => "float32",
            ColumnType::Float64 => "float64",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::Datetime => "datetime",
            ColumnType::Year => "year",
            ColumnType::Decimal => "decimal",
            ColumnType::Text => "text",
            ColumnType::Blob => "blob",
            ColumnType::Varchar => "varchar",
            ColumnType::Varbinary => "varbinary",
            ColumnType::Char => "char",
            ColumnType::Binary => "binary",
            ColumnType::Bit => "bit",
            ColumnType::Enum => "enum",
            ColumnType::Set => "set",
            ColumnType::Tuple => "tuple",
            ColumnType::Geometry => "geometry",
            ColumnType::Json => "json",
            ColumnType::Expression => "expression",
        }
    }

    /// Signed or unsigned integer types, including `year`.
    pub fn is_integral(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            ColumnType::Int8
                | ColumnType::Int16
                | ColumnType::Int24
                | ColumnType::Int32
                | ColumnType::Int64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            ColumnType::Uint8
                | ColumnType::Uint16
                | ColumnType::Uint24
                | ColumnType::Uint32
                | ColumnType::Uint64
                | ColumnType::Year
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, ColumnType::Float32 | ColumnType::Float64)
    }

    pub fn is_number(self) -> bool {
        self.is_integral() || self.is_float() || self == ColumnType::Decimal
    }

    /// Types whose SQL literal form is a quoted string.
    pub fn is_quoted(self) -> bool {
        matches!(
            self,
            ColumnType::Timestamp
                | ColumnType::Date
                | ColumnType::Time
                | ColumnType::Datetime
                | ColumnType::Text
                | ColumnType::Blob
                | ColumnType::Varchar
                | ColumnType::Varbinary
                | ColumnType::Char
                | ColumnType::Binary
                | ColumnType::Enum
                | ColumnType::Set
                | ColumnType::Geometry
                | ColumnType::Json
        )
    }

    pub fn is_text(self) -> bool {
        matches!(self, ColumnType::Text | ColumnType::Varchar | ColumnType::Char)
    }

    pub fn is_binary(self) -> bool {
        matches!(
            self,
            ColumnType::Blob | ColumnType::Varbinary | ColumnType::Binary
        )
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColumnType {
    type Err = SqlTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "null_type" {
            return Ok(ColumnType::Null);
        }
        ColumnType::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| SqlTypesError::UnknownType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for typ in ColumnType::ALL {
            assert_eq!(typ.as_str().parse::<ColumnType>(), Ok(typ));
        }
        assert_eq!("NULL_TYPE".parse::<ColumnType>(), Ok(ColumnType::Null));
        assert_eq!(" VarChar ".parse::<ColumnType>(), Ok(ColumnType::Varchar));
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "varchar2".parse::<ColumnType>(),
            Err(SqlTypesError::UnknownType("varchar2".to_string()))
        );
    }

    #[test]
    fn serde_uses_display_names() {
        for typ in ColumnType::ALL {
            let json = serde_json::to_string(&typ).expect("serialize");
            assert_eq!(json, format!("\"{typ}\""));
        }
    }

    #[test]
    fn classification() {
        assert!(ColumnType::Int24.is_signed());
        assert!(ColumnType::Year.is_unsigned());
        assert!(ColumnType::Year.is_integral());
        assert!(!ColumnType::Decimal.is_integral());
        assert!(ColumnType::Decimal.is_number());
        assert!(ColumnType::Float32.is_float());
        assert!(ColumnType::Varbinary.is_quoted());
        assert!(ColumnType::Varbinary.is_binary());
        assert!(!ColumnType::Varbinary.is_text());
        assert!(ColumnType::Char.is_text());
        assert!(!ColumnType::Bit.is_quoted());
        assert!(!ColumnType::Null.is_number());
    }
}
