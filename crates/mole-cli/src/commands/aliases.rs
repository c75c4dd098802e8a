use mole_core::error::MoleError;
use mole_core::schema::builtin::default_config_json;
use mole_core::schema::{load_alias_config, AliasConfig, AliasTable};
use std::path::Path;

pub fn list(json: bool) -> Result<(), MoleError> {
    if json {
        println!("{}", default_config_json().trim_end());
        return Ok(());
    }

    let config = AliasConfig::builtin()?;
    println!("{} (v{})", config.name, config.version);
    if let Some(ref desc) = config.description {
        println!("{desc}");
    }
    println!();

    print_table("Sample schema", &config.sample);
    print_table("Reference schema", &config.ranges);
    Ok(())
}

fn print_table(title: &str, table: &AliasTable) {
    println!("{title}:\n");
    let width = table.fields.iter().map(|f| f.len()).max().unwrap_or(10);
    for field in &table.fields {
        let keys: Vec<&str> = table
            .keys_for(field)
            .into_iter()
            .filter(|k| *k != field.as_str())
            .collect();
        if keys.is_empty() {
            println!("  {field}");
        } else {
            println!("  {:<width$}  <- {}", field, keys.join(", "), width = width);
        }
    }
    println!();
}

pub fn validate(path: &Path) -> Result<(), MoleError> {
    let config = load_alias_config(path)?;
    println!(
        "Valid: \"{}\" (v{}), {} sample alias(es), {} reference alias(es)",
        config.name,
        config.version,
        config.sample.aliases.len(),
        config.ranges.aliases.len()
    );
    Ok(())
}
