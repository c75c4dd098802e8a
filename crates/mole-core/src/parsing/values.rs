use rust_decimal::Decimal;
use std::str::FromStr;

/// Coerce a metric cell to a number.
///
/// Coercion is quiet: empty cells, placeholder markers and anything that
/// does not parse become `None`, never an error. A missing value then shows
/// up downstream as a compliance violation instead of an ingestion failure.
///
/// Handles formats like:
/// - "68" -> Some(68)
/// - "  7.25 " -> Some(7.25)
/// - "7,5" -> Some(7.5) (decimal comma)
/// - "1,000" -> None (thousands grouping)
/// - "1e3" -> Some(1000)
/// - "", "-", "*", "N/A", "NaN" -> None
/// - "high", "12 ppm" -> None
pub fn parse_metric(s: &str) -> Option<Decimal> {
    let s = s.trim();

    if is_missing_marker(s) {
        return None;
    }

    parse_decimal(s)
}

/// Parse a decimal value, accepting a decimal comma when no dot is present.
///
/// A comma followed by exactly three digits reads as a thousands separator
/// ("1,000") and is rejected rather than guessed at, unless the integer part
/// is zero ("0,125").
fn parse_decimal(s: &str) -> Option<Decimal> {
    let normalized = match s.split_once(',') {
        Some((int, frac)) if !s.contains('.') => {
            if looks_like_grouping(int, frac) {
                return None;
            }
            format!("{int}.{frac}")
        }
        _ => s.to_string(),
    };
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

fn looks_like_grouping(int: &str, frac: &str) -> bool {
    let digits = int.trim_start_matches(['-', '+']);
    frac.len() == 3 && frac.chars().all(|c| c.is_ascii_digit()) && digits != "0"
}

fn is_missing_marker(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    let lower = s.to_lowercase();
    matches!(
        lower.as_str(),
        "-" | "*" | "—" | "n/a" | "na" | "n.a." | "nan" | "null" | "none"
    )
}

/// Convert a spreadsheet float to Decimal, preserving its printed precision.
///
/// Uses a string round-trip to avoid floating-point artifacts
/// (e.g., 0.0035_f64 becoming 0.00349999...).
pub fn f64_to_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    let s = format!("{f}");
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
}
