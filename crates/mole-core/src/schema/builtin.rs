use crate::error::MoleError;
use crate::schema::{parse_alias_config_str, AliasConfig};

const DEFAULT_ALIASES_JSON: &str = include_str!("../../../../aliases/default.json");

/// The built-in alias config as JSON text.
pub fn default_config_json() -> &'static str {
    DEFAULT_ALIASES_JSON
}

/// Load the built-in alias config.
pub fn default_config() -> Result<AliasConfig, MoleError> {
    parse_alias_config_str(DEFAULT_ALIASES_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metric;

    #[test]
    fn test_default_config_is_valid() {
        let config = default_config().unwrap();
        assert_eq!(config.sample.fields.len(), 7);
        assert_eq!(config.ranges.fields.len(), 11);
    }

    #[test]
    fn test_report_column_titles_resolve() {
        let config = default_config().unwrap();
        for metric in Metric::ALL {
            assert_eq!(
                config.sample.lookup(metric.column_title()),
                Some(metric.field()),
                "{metric}"
            );
        }
        assert_eq!(config.sample.lookup("SAMPLE ID"), Some("sample_id"));
        assert_eq!(config.sample.lookup("CHEMICAL"), Some("chemical"));
    }

    #[test]
    fn test_workbook_range_headers_resolve() {
        let config = default_config().unwrap();
        let cases = [
            ("Chemical", "chemical"),
            ("Concentration_ppm_Min", "concentration_ppm_min"),
            ("Concentration_ppm_Max", "concentration_ppm_max"),
            ("pH_Level_Min", "ph_min"),
            ("pH_Level_Max", "ph_max"),
            ("Temperature_C_Min", "temperature_celsius_min"),
            ("Temperature_C_Max", "temperature_celsius_max"),
            ("Pressure_kPa_Min", "pressure_kpa_min"),
            ("Pressure_kPa_Max", "pressure_kpa_max"),
            ("Flow_Rate_L_min_Min", "flow_rate_l_min_min"),
            ("Flow_Rate_L_min_Max", "flow_rate_l_min_max"),
        ];
        for (raw, canonical) in cases {
            assert_eq!(config.ranges.lookup(raw), Some(canonical), "{raw}");
        }
    }

    #[test]
    fn test_loose_sample_headers_resolve() {
        let config = default_config().unwrap();
        assert_eq!(config.sample.lookup("Temp (°C)"), Some("temperature_celsius"));
        assert_eq!(config.sample.lookup("Flow (L/min)"), Some("flow_rate_l_min"));
        assert_eq!(config.sample.lookup("Substance"), Some("chemical"));
        assert_eq!(config.sample.lookup("Notes"), None);
    }
}
