pub mod decode;
pub mod merge;

use std::io::Write;

use sqltypes::QueryResult;

use crate::error::CliError;

/// Pretty JSON of `result` on stdout, one document per call.
fn print_result(result: &QueryResult) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(result)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{json}")?;
    Ok(())
}
