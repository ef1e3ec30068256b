use crate::config::{DecodeArgs, Fixture};
use crate::error::CliError;

pub fn run(args: &DecodeArgs) -> Result<(), CliError> {
    let fixture = Fixture::load(&args.fixture)?;
    let policy = args
        .included_fields
        .or(fixture.included_fields)
        .unwrap_or_default();

    let result = fixture.decode(args.repair)?;
    tracing::info!(
        fixture = %args.fixture,
        rows = result.row_count(),
        columns = result.column_count(),
        repaired = args.repair,
        "decoded fixture"
    );

    let truncated = result.truncate(args.truncate);
    if truncated.column_count() != result.column_count() {
        tracing::debug!(columns = truncated.column_count(), "truncated result");
    }

    let stripped = truncated.strip_metadata(policy);
    tracing::debug!(%policy, "stripped metadata");

    super::print_result(&stripped)
}
