use std::sync::Arc;

use base64::Engine;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use sqltypes::{ColumnType, Field, IncludedFields, QueryResult, WireRow, decode_rows};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "sqlrow", about = "Decode and reshape wire-encoded query results")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode one fixture and print the result as JSON
    Decode(DecodeArgs),
    /// Decode several fixtures and append them into one result
    Merge(MergeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct DecodeArgs {
    /// Path to the TOML fixture
    #[arg(long, default_value = "fixture.toml", env = "SQLROW_FIXTURE")]
    pub fixture: String,

    /// Keep only the first N columns (0 keeps all)
    #[arg(long, default_value_t = 0)]
    pub truncate: usize,

    /// Column metadata to keep: type_only, type_and_name or all
    #[arg(long)]
    pub included_fields: Option<IncludedFields>,

    /// Decode every column as varbinary first, then repair to the fixture types
    #[arg(long)]
    pub repair: bool,
}

#[derive(Args, Clone, Debug)]
pub struct MergeArgs {
    /// Fixtures to merge, in order
    #[arg(required = true)]
    pub fixtures: Vec<String>,

    /// Column metadata to keep: type_only, type_and_name or all
    #[arg(long)]
    pub included_fields: Option<IncludedFields>,
}

// ---- TOML Fixture ----

/// A query result as it would arrive from the wire: schema plus raw rows.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub rows_affected: u64,
    #[serde(default)]
    pub insert_id: u64,
    /// Default policy when `--included-fields` is not given.
    #[serde(default)]
    pub included_fields: Option<IncludedFields>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub rows: Vec<RowConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RowConfig {
    pub lengths: Vec<i64>,
    /// Concatenated column bytes as UTF-8 text.
    #[serde(default)]
    pub values: Option<String>,
    /// Concatenated column bytes, base64 encoded (for binary data).
    #[serde(default)]
    pub values_base64: Option<String>,
}

impl RowConfig {
    fn to_wire(&self) -> Result<WireRow, CliError> {
        let values = match (&self.values, &self.values_base64) {
            (Some(_), Some(_)) => {
                return Err(CliError::Config {
                    context: "row",
                    detail: "values and values_base64 are mutually exclusive".into(),
                });
            }
            (Some(text), None) => text.clone().into_bytes(),
            (None, Some(b64)) => base64::engine::general_purpose::STANDARD
                .decode(b64)
                .map_err(|e| CliError::Config { context: "row", detail: e.to_string() })?,
            (None, None) => Vec::new(),
        };
        Ok(WireRow::new(self.lengths.clone(), values))
    }
}

impl Fixture {
    pub fn load(path: &str) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config { context: "read", detail: format!("'{path}': {e}") })?;
        Self::parse(&content)
            .map_err(|e| CliError::Config { context: "parse", detail: format!("'{path}': {e}") })
    }

    pub fn parse(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Decode the fixture rows against its schema.
    ///
    /// With `repair`, rows are first decoded as untyped varbinary and then
    /// retagged with the real column types.
    pub fn decode(&self, repair: bool) -> Result<QueryResult, CliError> {
        let rows = self
            .rows
            .iter()
            .map(RowConfig::to_wire)
            .collect::<Result<Vec<_>, _>>()?;

        if self.fields.is_empty() {
            if !rows.is_empty() {
                return Err(CliError::Config {
                    context: "fixture",
                    detail: format!("{} rows but no [[fields]]", rows.len()),
                });
            }
            return Ok(QueryResult {
                fields: None,
                rows_affected: self.rows_affected,
                insert_id: self.insert_id,
                rows: Vec::new(),
            });
        }

        let fields: Vec<Arc<Field>> = self.fields.iter().cloned().map(Arc::new).collect();
        if !repair {
            return Ok(QueryResult::from_wire(fields, &rows, self.rows_affected, self.insert_id)?);
        }

        let placeholder = vec![Field::typed(ColumnType::Varbinary); fields.len()];
        let mut result = QueryResult {
            rows: decode_rows(&placeholder, &rows)?,
            fields: Some(fields),
            rows_affected: self.rows_affected,
            insert_id: self.insert_id,
        };
        let schema = result.fields.clone().unwrap_or_default();
        result.repair(&schema)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqltypes::Value;

    const FIXTURE: &str = r#"
rows_affected = 3
insert_id = 9
included_fields = "type_only"

[[fields]]
name = "id"
type = "int64"
table = "users"

[[fields]]
name = "name"
type = "varchar"

[[rows]]
lengths = [1, 5]
values = "1alice"

[[rows]]
lengths = [1, -1]
values = "2"
"#;

    #[test]
    fn parses_fixture() {
        let fixture = Fixture::parse(FIXTURE).expect("parse");
        assert_eq!(fixture.rows_affected, 3);
        assert_eq!(fixture.included_fields, Some(IncludedFields::TypeOnly));
        assert_eq!(fixture.fields[0].table, "users");
        assert_eq!(fixture.fields[1].field_type, ColumnType::Varchar);
        assert_eq!(fixture.rows.len(), 2);
    }

    #[test]
    fn decodes_fixture() {
        let result = Fixture::parse(FIXTURE).expect("parse").decode(false).expect("decode");
        assert_eq!(result.insert_id, 9);
        assert_eq!(
            result.rows,
            vec![
                vec![Value::int64(1), Value::varchar("alice")],
                vec![Value::int64(2), Value::null()],
            ]
        );
    }

    #[test]
    fn repair_path_matches_direct_decode() {
        let fixture = Fixture::parse(FIXTURE).expect("parse");
        assert_eq!(
            fixture.decode(true).expect("repair"),
            fixture.decode(false).expect("decode")
        );
    }

    #[test]
    fn base64_values() {
        let fixture = Fixture::parse(
            r#"
[[fields]]
type = "varbinary"

[[rows]]
lengths = [2]
values_base64 = "/wA="
"#,
        )
        .expect("parse");
        let result = fixture.decode(false).expect("decode");
        assert_eq!(result.rows, vec![vec![Value::varbinary(&[0xff, 0x00])]]);
    }

    #[test]
    fn rows_without_fields_are_rejected() {
        let fixture = Fixture::parse("[[rows]]\nlengths = [1]\nvalues = \"x\"\n").expect("parse");
        assert!(matches!(
            fixture.decode(false),
            Err(CliError::Config { context: "fixture", .. })
        ));
    }

    #[test]
    fn bundled_fixture_drops_extra_column() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/users.toml");
        let result = Fixture::load(path).expect("load").decode(false).expect("decode");
        assert_eq!(result.column_count(), 3);
        assert_eq!(
            result.rows[1],
            vec![
                Value::int64(2),
                Value::varchar("bob"),
                Value::trusted(ColumnType::Int8, &b"42"[..]),
            ]
        );
    }

    #[test]
    fn schema_less_fixture() {
        let fixture = Fixture::parse("rows_affected = 4\n").expect("parse");
        let result = fixture.decode(false).expect("decode");
        assert_eq!(result.fields, None);
        assert_eq!(result.rows_affected, 4);
    }
}
