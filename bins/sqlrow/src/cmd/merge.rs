use crate::config::{Fixture, MergeArgs};
use crate::error::CliError;

pub fn run(args: &MergeArgs) -> Result<(), CliError> {
    let mut fixtures = args.fixtures.iter();
    let first = fixtures.next().ok_or_else(|| CliError::Config {
        context: "args",
        detail: "no fixtures given".into(),
    })?;

    let mut merged = Fixture::load(first)?.decode(false)?;
    for path in fixtures {
        let next = Fixture::load(path)?.decode(false)?;
        tracing::info!(fixture = %path, rows = next.row_count(), "appending fixture");
        merged.append_result(next);
    }

    tracing::info!(
        fixtures = args.fixtures.len(),
        rows = merged.row_count(),
        rows_affected = merged.rows_affected,
        "merged results"
    );

    let policy = args.included_fields.unwrap_or_default();
    super::print_result(&merged.strip_metadata(policy))
}
