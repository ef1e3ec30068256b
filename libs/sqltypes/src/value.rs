use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::SqlTypesError;
use crate::types::ColumnType;

/// A single column value: a type tag and the raw bytes of its encoding.
///
/// Values are immutable. Retagging or copying produces a new `Value`.
/// The bytes live in a shared [`Bytes`] buffer, so values decoded from one
/// wire row are slices of the same allocation until [`Value::deep_copy`]
/// detaches them.
///
/// Equality is structural: same tag and identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Value {
    typ: ColumnType,
    raw: Bytes,
}

/// Positional array of values. Order matches the result's fields.
pub type Row = Vec<Value>;

impl Value {
    /// Tags `raw` with `typ` without looking at the bytes.
    ///
    /// The caller vouches that `raw` is a valid encoding for `typ`; use it
    /// for bytes that come from an already-validated source such as the
    /// wire protocol. A `Null` tag always produces an empty value and the
    /// given bytes are dropped.
    pub fn trusted(typ: ColumnType, raw: impl Into<Bytes>) -> Self {
        if typ == ColumnType::Null {
            return Self::null();
        }
        Self {
            typ,
            raw: raw.into(),
        }
    }

    /// Checked constructor for boundary code that has not validated its input.
    ///
    /// Numeric types must parse as numbers; quoted types, decimal, bit and
    /// expression are taken as-is.
    pub fn new(typ: ColumnType, raw: impl Into<Bytes>) -> Result<Self, SqlTypesError> {
        let raw = raw.into();
        let invalid = |reason: String| SqlTypesError::InvalidValue { typ, reason };

        match typ {
            ColumnType::Null if raw.is_empty() => Ok(Self::null()),
            ColumnType::Null => Err(invalid(format!("{} bytes given for NULL", raw.len()))),
            ColumnType::Tuple => Err(SqlTypesError::UnsupportedType(typ)),
            t if t.is_signed() => {
                let text = std::str::from_utf8(&raw).map_err(|e| invalid(e.to_string()))?;
                text.parse::<i64>().map_err(|e| invalid(format!("'{text}': {e}")))?;
                Ok(Self { typ, raw })
            }
            t if t.is_unsigned() => {
                let text = std::str::from_utf8(&raw).map_err(|e| invalid(e.to_string()))?;
                text.parse::<u64>().map_err(|e| invalid(format!("'{text}': {e}")))?;
                Ok(Self { typ, raw })
            }
            t if t.is_float() => {
                let text = std::str::from_utf8(&raw).map_err(|e| invalid(e.to_string()))?;
                text.parse::<f64>().map_err(|e| invalid(format!("'{text}': {e}")))?;
                Ok(Self { typ, raw })
            }
            _ => Ok(Self { typ, raw }),
        }
    }

    pub fn null() -> Self {
        Self {
            typ: ColumnType::Null,
            raw: Bytes::new(),
        }
    }

    pub fn int64(v: i64) -> Self {
        Self::trusted(ColumnType::Int64, v.to_string().into_bytes())
    }

    pub fn uint64(v: u64) -> Self {
        Self::trusted(ColumnType::Uint64, v.to_string().into_bytes())
    }

    pub fn float64(v: f64) -> Self {
        Self::trusted(ColumnType::Float64, v.to_string().into_bytes())
    }

    pub fn varchar(v: &str) -> Self {
        Self::trusted(ColumnType::Varchar, Bytes::copy_from_slice(v.as_bytes()))
    }

    pub fn varbinary(v: &[u8]) -> Self {
        Self::trusted(ColumnType::Varbinary, Bytes::copy_from_slice(v))
    }

    pub fn value_type(&self) -> ColumnType {
        self.typ
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Shared handle to the raw bytes (no copy).
    pub fn to_bytes(&self) -> Bytes {
        self.raw.clone()
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_null(&self) -> bool {
        self.typ == ColumnType::Null
    }

    /// Same bytes under a different tag.
    pub fn retyped(&self, typ: ColumnType) -> Self {
        Self::trusted(typ, self.raw.clone())
    }

    /// Copy with its own allocation, sharing nothing with `self`.
    pub fn deep_copy(&self) -> Self {
        Self {
            typ: self.typ,
            raw: Bytes::copy_from_slice(&self.raw),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return f.write_str("NULL");
        }
        write!(f, "{}({})", self.typ, String::from_utf8_lossy(&self.raw))
    }
}

impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        if self.is_null() {
            let mut s = serializer.serialize_struct("Value", 1)?;
            s.serialize_field("type", &self.typ)?;
            return s.end();
        }

        let mut s = serializer.serialize_struct("Value", 2)?;
        s.serialize_field("type", &self.typ)?;
        match std::str::from_utf8(&self.raw) {
            Ok(text) if !self.typ.is_binary() => s.serialize_field("value", text)?,
            _ => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(&self.raw);
                s.serialize_field("base64", &encoded)?;
            }
        }
        s.end()
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accepted shapes:
        // 1. {"type":"null"}
        // 2. {"type":"varchar","value":"text"}
        // 3. {"type":"blob","base64":"..."}
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "type")]
            typ: ColumnType,
            value: Option<String>,
            base64: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let bytes = match (raw.value, raw.base64) {
            (Some(_), Some(_)) => {
                return Err(serde::de::Error::custom(
                    "value and base64 are mutually exclusive",
                ));
            }
            (Some(text), None) => Bytes::from(text.into_bytes()),
            (None, Some(b64)) => base64::engine::general_purpose::STANDARD
                .decode(b64)
                .map(Bytes::from)
                .map_err(serde::de::Error::custom)?,
            (None, None) => Bytes::new(),
        };
        Ok(Value::trusted(raw.typ, bytes))
    }
}
