use mole_core::error::MoleError;
use mole_core::ingest::read_table_file;
use mole_core::model::Metric;
use mole_core::ranges::load_range_table;
use std::path::Path;

use crate::commands::alias_config;

pub fn run(file: &Path, aliases: Option<&Path>) -> Result<(), MoleError> {
    let config = alias_config(aliases)?;
    let table = read_table_file(file)?;
    let ranges = load_range_table(&table, &config.ranges)?;

    println!("{} chemical(s) in {}\n", ranges.len(), file.display());
    if ranges.is_empty() {
        return Ok(());
    }

    let name_width = ranges
        .iter()
        .map(|e| e.chemical.chars().count())
        .max()
        .unwrap_or(8)
        .max("Chemical".len());

    print!("  {:<width$}", "Chemical", width = name_width);
    for metric in Metric::ALL {
        print!("  {:>16}", metric.label());
    }
    println!();

    for entry in ranges.iter() {
        print!("  {:<width$}", entry.chemical, width = name_width);
        for metric in Metric::ALL {
            print!("  {:>16}", entry.bounds(metric).to_string());
        }
        println!();
    }

    Ok(())
}
