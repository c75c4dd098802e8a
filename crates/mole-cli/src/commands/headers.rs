use mole_core::error::MoleError;
use mole_core::ingest::read_table_file;
use mole_core::schema::{resolve, Resolution};
use std::path::Path;

use crate::commands::alias_config;
use crate::SchemaKind;

pub fn run(file: &Path, schema: SchemaKind, aliases: Option<&Path>) -> Result<(), MoleError> {
    let config = alias_config(aliases)?;
    let table = read_table_file(file)?;
    let (label, aliases) = match schema {
        SchemaKind::Sample => ("sample", &config.sample),
        SchemaKind::Ranges => ("ranges", &config.ranges),
    };

    let headers = table.headers();
    let map = resolve(&headers, aliases);

    println!("{} ({} schema, aliases: {})\n", file.display(), label, config.name);

    let raw_width = map
        .columns
        .iter()
        .map(|c| c.raw.chars().count())
        .max()
        .unwrap_or(10);
    let key_width = map
        .columns
        .iter()
        .map(|c| c.key.chars().count())
        .max()
        .unwrap_or(10);

    for col in &map.columns {
        let outcome = match &col.resolution {
            Resolution::Canonical { field } => format!("-> {field}"),
            Resolution::Shadowed { field, claimed_by } => {
                format!("(pass-through, '{field}' already taken by '{claimed_by}')")
            }
            Resolution::Unmapped => "(pass-through)".to_string(),
        };
        println!(
            "  {:<rw$}  {:<kw$}  {}",
            col.raw,
            col.key,
            outcome,
            rw = raw_width,
            kw = key_width
        );
    }

    let missing = map.missing(aliases);
    println!();
    if missing.is_empty() {
        println!("All {} canonical field(s) provided.", aliases.fields.len());
    } else {
        println!("Missing canonical field(s): {}", missing.join(", "));
    }

    Ok(())
}
