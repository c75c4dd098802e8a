pub mod builtin;
pub mod resolve;

use crate::error::MoleError;
use crate::model::{Metric, CHEMICAL, SAMPLE_ID};
use crate::parsing::normalize::normalize_header;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub use resolve::{resolve, ColumnResolution, RenameMap, Resolution, ResolvedTable};

/// Alias table for one canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasTable {
    /// Canonical fields, in output order.
    pub fields: Vec<String>,
    /// Map of normalized header key -> canonical field.
    /// Every canonical field also matches its own name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new(fields: &[&str], aliases: &[(&str, &str)]) -> Self {
        AliasTable {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            aliases: aliases
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Canonical target for an already-normalized key.
    pub fn lookup_key(&self, key: &str) -> Option<&str> {
        if key.is_empty() {
            return None;
        }
        if let Some(target) = self.aliases.get(key) {
            return Some(target.as_str());
        }
        self.fields.iter().find(|f| *f == key).map(|f| f.as_str())
    }

    /// Canonical target for a raw header.
    pub fn lookup(&self, raw_header: &str) -> Option<&str> {
        self.lookup_key(&normalize_header(raw_header))
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// All keys (aliases and the field name itself) that reach `field`.
    pub fn keys_for<'a>(&'a self, field: &'a str) -> Vec<&'a str> {
        let mut keys: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, target)| *target == field)
            .map(|(key, _)| key.as_str())
            .collect();
        if !keys.contains(&field) {
            keys.insert(0, field);
        }
        keys
    }
}

/// The pair of alias tables the pipeline runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Sample schema: sample id, chemical and the five metric fields.
    pub sample: AliasTable,
    /// Reference schema: chemical plus a min and max field per metric.
    pub ranges: AliasTable,
}

impl AliasConfig {
    /// The alias config shipped with the crate.
    pub fn builtin() -> Result<AliasConfig, MoleError> {
        builtin::default_config()
    }
}

/// Fields the sample schema must define.
pub fn required_sample_fields() -> Vec<&'static str> {
    let mut fields = vec![SAMPLE_ID, CHEMICAL];
    fields.extend(Metric::ALL.iter().map(|m| m.field()));
    fields
}

/// Fields the reference schema must define.
pub fn required_range_fields() -> Vec<&'static str> {
    let mut fields = vec![CHEMICAL];
    for m in Metric::ALL {
        fields.push(m.min_field());
        fields.push(m.max_field());
    }
    fields
}

/// Load an alias config from a JSON file.
pub fn load_alias_config(path: &Path) -> Result<AliasConfig, MoleError> {
    let content = std::fs::read_to_string(path).map_err(|e| MoleError::AliasConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: AliasConfig =
        serde_json::from_str(&content).map_err(|e| MoleError::AliasConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_alias_config(&config)?;
    Ok(config)
}

/// Parse an alias config from a JSON string (no file path context).
pub fn parse_alias_config_str(json: &str) -> Result<AliasConfig, MoleError> {
    let config: AliasConfig = serde_json::from_str(json)?;
    validate_alias_config(&config)?;
    Ok(config)
}

/// Validate that an alias config is well-formed.
pub fn validate_alias_config(config: &AliasConfig) -> Result<(), MoleError> {
    validate_table("sample", &config.sample, &required_sample_fields())?;
    validate_table("ranges", &config.ranges, &required_range_fields())
}

fn validate_table(label: &str, table: &AliasTable, required: &[&str]) -> Result<(), MoleError> {
    for field in required {
        if !table.has_field(field) {
            return Err(MoleError::AliasConfigInvalid(format!(
                "{label} schema is missing required field '{field}'"
            )));
        }
    }

    for (i, field) in table.fields.iter().enumerate() {
        if table.fields[..i].contains(field) {
            return Err(MoleError::AliasConfigInvalid(format!(
                "{label} schema lists field '{field}' more than once"
            )));
        }
        if normalize_header(field) != *field {
            return Err(MoleError::AliasConfigInvalid(format!(
                "{label} field '{field}' is not in normalized form (expected '{}')",
                normalize_header(field)
            )));
        }
    }

    for (key, target) in &table.aliases {
        if !table.has_field(target) {
            return Err(MoleError::AliasConfigInvalid(format!(
                "{label} alias '{key}' targets unknown field '{target}'"
            )));
        }
        if normalize_header(key) != *key {
            return Err(MoleError::AliasConfigInvalid(format!(
                "{label} alias '{key}' can never match; its normalized form is '{}'",
                normalize_header(key)
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json(extra_sample_alias: &str) -> String {
        format!(
            r#"{{
            "name": "Test",
            "version": "1",
            "sample": {{
                "fields": ["sample_id", "chemical", "concentration_ppm", "ph",
                           "temperature_celsius", "pressure_kpa", "flow_rate_l_min"],
                "aliases": {{ "conc": "concentration_ppm"{extra_sample_alias} }}
            }},
            "ranges": {{
                "fields": ["chemical",
                    "concentration_ppm_min", "concentration_ppm_max",
                    "ph_min", "ph_max",
                    "temperature_celsius_min", "temperature_celsius_max",
                    "pressure_kpa_min", "pressure_kpa_max",
                    "flow_rate_l_min_min", "flow_rate_l_min_max"]
            }}
        }}"#
        )
    }

    #[test]
    fn test_keys_for_lists_field_then_aliases() {
        let table = AliasTable::new(
            &["chemical", "ph"],
            &[("substance", "chemical"), ("analyte", "chemical"), ("ph_level", "ph")],
        );
        let field = String::from("chemical");
        assert_eq!(table.keys_for(&field), vec!["chemical", "analyte", "substance"]);
        assert_eq!(table.keys_for("ph"), vec!["ph", "ph_level"]);
    }

    #[test]
    fn test_parse_valid_config() {
        let config = parse_alias_config_str(&minimal_json("")).unwrap();
        assert_eq!(config.sample.lookup("Conc"), Some("concentration_ppm"));
        assert_eq!(config.sample.lookup("pH"), Some("ph"));
        assert_eq!(config.ranges.lookup("PH MIN"), Some("ph_min"));
    }

    #[test]
    fn test_unknown_target_rejected() {
        let json = minimal_json(r#", "acidity": "acid""#);
        assert!(matches!(
            parse_alias_config_str(&json),
            Err(MoleError::AliasConfigInvalid(_))
        ));
    }

    #[test]
    fn test_unnormalized_alias_rejected() {
        let json = minimal_json(r#", "Flow Rate": "flow_rate_l_min""#);
        let err = parse_alias_config_str(&json).unwrap_err();
        assert!(err.to_string().contains("flow_rate"));
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let json = minimal_json("").replace("\"ph_max\",", "");
        assert!(parse_alias_config_str(&json).is_err());
    }

    #[test]
    fn test_empty_key_never_matches() {
        let table = AliasTable::new(&["chemical"], &[]);
        assert_eq!(table.lookup("   "), None);
    }

    #[test]
    fn test_keys_for_includes_field_itself() {
        let table = AliasTable::new(&["chemical"], &[("substance", "chemical")]);
        assert_eq!(table.keys_for("chemical"), vec!["chemical", "substance"]);
    }
}
