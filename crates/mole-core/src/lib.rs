pub mod aggregate;
pub mod error;
pub mod evaluate;
pub mod ingest;
pub mod model;
pub mod parsing;
pub mod ranges;
pub mod report;
pub mod schema;

use error::MoleError;
use ingest::{read_table_file, RawTable};
use ranges::{load_range_table, RangeTable};
use report::ComplianceReport;
use schema::{AliasConfig, ResolvedTable};
use std::path::Path;

/// Main API entry point: evaluate a sample table against a reference table.
///
/// The reference table is loaded first, so a bad reference table fails the
/// run before any sample row is looked at. A sample table missing required
/// columns is not an error: every row comes back UNKNOWN and the gap is
/// listed in [`ComplianceReport::missing_sample_columns`].
pub fn check_tables(
    samples: &RawTable,
    ranges: &RawTable,
    config: &AliasConfig,
) -> Result<ComplianceReport, MoleError> {
    let range_table = load_range_table(ranges, &config.ranges)?;
    Ok(check_against(samples, &range_table, config))
}

/// Evaluate a sample table against an already loaded [`RangeTable`].
pub fn check_against(
    samples: &RawTable,
    ranges: &RangeTable,
    config: &AliasConfig,
) -> ComplianceReport {
    let resolved = ResolvedTable::samples_from_raw(samples, &config.sample);
    let missing_sample_columns = evaluate::missing_required_columns(&resolved);
    let evaluated = evaluate::evaluate_table(&resolved, ranges);
    let aggregation = aggregate::aggregate(&evaluated);

    let report = ComplianceReport {
        samples: evaluated,
        summaries: aggregation.summaries,
        score: aggregation.score,
        missing_sample_columns,
    };

    log::info!(
        "evaluated {} sample(s) across {} chemical(s): {} compliant, {} non-compliant, {} unknown chemical, {} unknown",
        report.samples.len(),
        report.summaries.len(),
        report.count(model::Status::Compliant),
        report.count(model::Status::NonCompliant),
        report.count(model::Status::UnknownChemical),
        report.count(model::Status::Unknown),
    );

    report
}

/// Read both tables from disk (CSV or XLSX by extension) and check them.
pub fn check_files(
    samples_path: &Path,
    ranges_path: &Path,
    config: &AliasConfig,
) -> Result<ComplianceReport, MoleError> {
    let ranges = read_table_file(ranges_path)?;
    let range_table = load_range_table(&ranges, &config.ranges)?;
    let samples = read_table_file(samples_path)?;
    Ok(check_against(&samples, &range_table, config))
}
