/// Normalize a raw column header to a comparison key.
///
/// Steps:
/// 1. Lowercase and trim
/// 2. Fold degree markers ("°C", "℃", "deg C", ...) to "celsius"
/// 3. Replace every non-alphanumeric character with underscores
/// 4. Collapse multiple underscores, strip leading/trailing ones
/// 5. Fold liters-per-minute spellings to "l_min"
///
/// Never fails; an empty or blank header becomes an empty key.
pub fn normalize_header(raw: &str) -> String {
    let s = fold_degree_markers(&raw.trim().to_lowercase());

    let mut normalized = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphanumeric() {
            normalized.push(c);
        } else {
            normalized.push('_');
        }
    }

    let collapsed = collapse_underscores(&normalized);
    let tokens: Vec<&str> = collapsed.split('_').filter(|t| !t.is_empty()).collect();
    fold_unit_tokens(&tokens).join("_")
}

/// Normalize a header that may be absent.
pub fn normalize_optional(raw: Option<&str>) -> String {
    raw.map(normalize_header).unwrap_or_default()
}

/// Replace degree symbols with a spaced "celsius" token.
///
/// "°C" and "° c" both fold; a bare "°" is read as Celsius since that is the
/// only temperature unit tracked. "°F" keeps a "deg" token so it never
/// silently matches a Celsius column.
fn fold_degree_markers(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '℃' => {
                out.push_str(" celsius ");
                i += 1;
            }
            '°' | 'º' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                let next = chars.get(j).copied();
                let after = chars.get(j + 1).copied();
                match next {
                    Some('c') if !after.is_some_and(|a| a.is_alphanumeric()) => {
                        out.push_str(" celsius ");
                        i = j + 1;
                    }
                    Some(n) if n.is_alphabetic() => {
                        out.push_str(" deg ");
                        i = j;
                    }
                    _ => {
                        out.push_str(" celsius ");
                        i += 1;
                    }
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn collapse_underscores(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_underscore = true; // start true to skip leading underscores
    for c in s.chars() {
        if c == '_' {
            if !prev_underscore {
                result.push('_');
            }
            prev_underscore = true;
        } else {
            result.push(c);
            prev_underscore = false;
        }
    }
    if result.ends_with('_') {
        result.pop();
    }
    result
}

/// Fold word-level unit spellings to their stable tokens.
fn fold_unit_tokens<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let tok = tokens[i];
        let next = tokens.get(i + 1).copied();
        let after = tokens.get(i + 2).copied();

        match (tok, next, after) {
            (
                "deg" | "degree" | "degrees",
                Some("c" | "celsius" | "celcius" | "centigrade"),
                _,
            ) => {
                out.push("celsius");
                i += 2;
            }
            ("degc" | "celcius" | "centigrade", _, _) => {
                out.push("celsius");
                i += 1;
            }
            ("l" | "liter" | "liters" | "litre" | "litres", Some("per"), Some("min" | "minute")) => {
                out.extend(["l", "min"]);
                i += 3;
            }
            ("liter" | "liters" | "litre" | "litres", Some("min" | "minute"), _) => {
                out.extend(["l", "min"]);
                i += 2;
            }
            ("l", Some("minute"), _) => {
                out.extend(["l", "min"]);
                i += 2;
            }
            ("lpm" | "lmin", _, _) => {
                out.extend(["l", "min"]);
                i += 1;
            }
            _ => {
                out.push(tok);
                i += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_header() {
        assert_eq!(normalize_header("Chemical"), "chemical");
    }

    #[test]
    fn test_whitespace_handling() {
        assert_eq!(normalize_header("  Sample ID  "), "sample_id");
    }

    #[test]
    fn test_units_in_parentheses() {
        assert_eq!(normalize_header("CONCENTRATION (ppm)"), "concentration_ppm");
        assert_eq!(normalize_header("PRESSURE (kPa)"), "pressure_kpa");
        assert_eq!(normalize_header("pH LEVEL"), "ph_level");
    }

    #[test]
    fn test_celsius_markers() {
        assert_eq!(normalize_header("Temperature (°C)"), "temperature_celsius");
        assert_eq!(normalize_header("Temperature ° C"), "temperature_celsius");
        assert_eq!(normalize_header("Temperature ℃"), "temperature_celsius");
        assert_eq!(normalize_header("Temp deg C"), "temp_celsius");
        assert_eq!(normalize_header("TEMPERATURE (Celsius)"), "temperature_celsius");
        assert_eq!(normalize_header("Temperature (°)"), "temperature_celsius");
    }

    #[test]
    fn test_spelled_out_degrees_celsius() {
        assert_eq!(
            normalize_header("Temperature (degrees Celsius)"),
            "temperature_celsius"
        );
        assert_eq!(normalize_header("Temp deg centigrade"), "temp_celsius");
        assert_eq!(normalize_header("Temperature °Celsius"), "temperature_celsius");
    }

    #[test]
    fn test_fahrenheit_is_not_folded_to_celsius() {
        assert_eq!(normalize_header("Temperature (°F)"), "temperature_deg_f");
    }

    #[test]
    fn test_flow_rate_spellings() {
        assert_eq!(normalize_header("Flow Rate (L/min)"), "flow_rate_l_min");
        assert_eq!(normalize_header("FLOW RATE (L_min)"), "flow_rate_l_min");
        assert_eq!(normalize_header("Flow rate L / min"), "flow_rate_l_min");
        assert_eq!(
            normalize_header("Flow Rate (litres per minute)"),
            "flow_rate_l_min"
        );
        assert_eq!(normalize_header("Flow LPM"), "flow_l_min");
    }

    #[test]
    fn test_range_headers() {
        assert_eq!(
            normalize_header("Flow_Rate_L_min_Min"),
            "flow_rate_l_min_min"
        );
        assert_eq!(normalize_header("Temperature_C_Max"), "temperature_c_max");
        assert_eq!(normalize_header("pH_Level_Min"), "ph_level_min");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(normalize_header("--Sample--#--ID--"), "sample_id");
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(normalize_header(""), "");
        assert_eq!(normalize_header("  ()  "), "");
        assert_eq!(normalize_optional(None), "");
    }

    #[test]
    fn test_collisions_are_not_detected_here() {
        assert_eq!(normalize_header("pH"), normalize_header("PH "));
    }
}
