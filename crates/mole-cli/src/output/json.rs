use mole_core::error::MoleError;
use mole_core::report::ComplianceReport;
use std::path::Path;

pub fn print(report: &ComplianceReport) -> Result<(), MoleError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

pub fn write(report: &ComplianceReport, path: &Path) -> Result<(), MoleError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
