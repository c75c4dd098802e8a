use mole_core::error::MoleError;
use mole_core::report::{table_header, table_row, ComplianceReport};
use std::path::Path;

/// Write the evaluated sample table, one row per sample in source order.
pub fn write(report: &ComplianceReport, path: &Path) -> Result<(), MoleError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table_header())?;
    for sample in &report.samples {
        writer.write_record(table_row(sample))?;
    }
    writer.flush()?;
    Ok(())
}
