use crate::error::MoleError;
use crate::ingest::RawTable;
use crate::model::{Bounds, Metric, PerMetric, CHEMICAL};
use crate::schema::{required_range_fields, AliasTable, ResolvedTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Acceptable bounds for one chemical, one inclusive pair per metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeEntry {
    pub chemical: String,
    pub bounds: PerMetric<Bounds>,
}

impl RangeEntry {
    pub fn new(chemical: impl Into<String>, bounds: PerMetric<Bounds>) -> Self {
        RangeEntry {
            chemical: chemical.into(),
            bounds,
        }
    }

    pub fn bounds(&self, metric: Metric) -> Bounds {
        *self.bounds.get(metric)
    }
}

/// Reference bounds indexed by chemical name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeTable {
    entries: BTreeMap<String, RangeEntry>,
}

impl RangeTable {
    /// Build a table from entries; the first entry for a chemical wins.
    pub fn from_entries(entries: impl IntoIterator<Item = RangeEntry>) -> Self {
        let mut table = RangeTable::default();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Insert unless the chemical is already present. Returns whether the
    /// entry was inserted.
    fn insert(&mut self, entry: RangeEntry) -> bool {
        if self.entries.contains_key(&entry.chemical) {
            return false;
        }
        self.entries.insert(entry.chemical.clone(), entry);
        true
    }

    /// Exact, case-sensitive lookup.
    ///
    /// Chemical names are compared as written, unlike column headers which
    /// are normalized: "acetone" does not find an "Acetone" entry.
    pub fn get(&self, chemical: &str) -> Option<&RangeEntry> {
        self.entries.get(chemical)
    }

    pub fn contains(&self, chemical: &str) -> bool {
        self.entries.contains_key(chemical)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in chemical-name order.
    pub fn iter(&self) -> impl Iterator<Item = &RangeEntry> {
        self.entries.values()
    }
}

/// Build a [`RangeTable`] from a raw reference table.
///
/// Fails before reading any row when no column resolves to the chemical key
/// or when any of the ten bound columns is missing. A row without a
/// chemical name is skipped; a row with a missing or non-numeric bound is
/// an error.
pub fn load_range_table(table: &RawTable, aliases: &AliasTable) -> Result<RangeTable, MoleError> {
    let resolved = ResolvedTable::from_raw(table, aliases);

    if resolved.is_missing(CHEMICAL) {
        return Err(MoleError::MissingChemicalKey {
            headers: table.headers().iter().map(|h| h.to_string()).collect(),
        });
    }

    let missing: Vec<String> = required_range_fields()
        .into_iter()
        .filter(|f| *f != CHEMICAL && resolved.is_missing(f))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(MoleError::MissingRangeColumns { missing });
    }

    let mut ranges = RangeTable::default();
    for row in 0..resolved.row_count {
        let Some(chemical) = resolved.text(CHEMICAL, row) else {
            log::warn!("reference row {} has no chemical name, skipped", row + 2);
            continue;
        };

        let bounds = PerMetric::try_from_fn(|m| {
            let bound = |field: &str| {
                resolved
                    .number(field, row)
                    .ok_or_else(|| MoleError::IncompleteRangeEntry {
                        chemical: chemical.clone(),
                        field: field.to_string(),
                    })
            };
            Ok::<Bounds, MoleError>(Bounds::new(bound(m.min_field())?, bound(m.max_field())?))
        })?;

        for (metric, b) in bounds.iter() {
            if b.min > b.max {
                log::warn!(
                    "{chemical}: {metric} minimum {} exceeds maximum {}; no value can comply",
                    b.min,
                    b.max
                );
            }
        }

        if !ranges.insert(RangeEntry::new(chemical.clone(), bounds)) {
            log::warn!(
                "duplicate reference entry for '{chemical}' at row {}, keeping the first",
                row + 2
            );
        }
    }

    log::debug!("loaded reference bounds for {} chemical(s)", ranges.len());
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::builtin::default_config;
    use rust_decimal_macros::dec;

    const HEADERS: [&str; 11] = [
        "Chemical",
        "Concentration_ppm_Min",
        "Concentration_ppm_Max",
        "pH_Level_Min",
        "pH_Level_Max",
        "Temperature_C_Min",
        "Temperature_C_Max",
        "Pressure_kPa_Min",
        "Pressure_kPa_Max",
        "Flow_Rate_L_min_Min",
        "Flow_Rate_L_min_Max",
    ];

    fn aliases() -> AliasTable {
        default_config().unwrap().ranges
    }

    #[test]
    fn test_load_workbook_layout() {
        let raw = RawTable::from_text_rows(
            &HEADERS,
            &[
                &["Acetone", "10", "50", "6", "8", "15", "30", "90", "110", "2", "8"],
                &["Benzene", "0", "5", "6.5", "7.5", "10", "25", "95", "105", "1", "3"],
            ],
        );
        let ranges = load_range_table(&raw, &aliases()).unwrap();
        assert_eq!(ranges.len(), 2);
        let acetone = ranges.get("Acetone").unwrap();
        assert_eq!(acetone.bounds(Metric::Concentration), Bounds::new(dec!(10), dec!(50)));
        assert_eq!(acetone.bounds(Metric::FlowRate), Bounds::new(dec!(2), dec!(8)));
        assert_eq!(
            ranges.get("Benzene").unwrap().bounds(Metric::Ph),
            Bounds::new(dec!(6.5), dec!(7.5))
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let raw = RawTable::from_text_rows(
            &HEADERS,
            &[&["Acetone", "10", "50", "6", "8", "15", "30", "90", "110", "2", "8"]],
        );
        let ranges = load_range_table(&raw, &aliases()).unwrap();
        assert!(ranges.contains("Acetone"));
        assert!(!ranges.contains("acetone"));
        assert!(!ranges.contains("ACETONE"));
    }

    #[test]
    fn test_missing_chemical_column() {
        let mut headers = HEADERS;
        headers[0] = "Name";
        let raw = RawTable::from_text_rows(&headers, &[]);
        let err = load_range_table(&raw, &aliases()).unwrap_err();
        match err {
            MoleError::MissingChemicalKey { headers } => assert_eq!(headers[0], "Name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_bound_columns_are_all_named() {
        let raw = RawTable::from_text_rows(
            &["Chemical", "pH_Level_Min", "pH_Level_Max"],
            &[&["Acetone", "6", "8"]],
        );
        let err = load_range_table(&raw, &aliases()).unwrap_err();
        match err {
            MoleError::MissingRangeColumns { missing } => {
                assert_eq!(missing.len(), 8);
                assert!(missing.contains(&"concentration_ppm_min".to_string()));
                assert!(!missing.contains(&"ph_min".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_columns_fail_even_without_rows() {
        let raw = RawTable::from_text_rows(&["Chemical"], &[]);
        assert!(matches!(
            load_range_table(&raw, &aliases()),
            Err(MoleError::MissingRangeColumns { .. })
        ));
    }

    #[test]
    fn test_blank_bound_cell_is_an_error() {
        let raw = RawTable::from_text_rows(
            &HEADERS,
            &[&["Acetone", "10", "50", "6", "", "15", "30", "90", "110", "2", "8"]],
        );
        let err = load_range_table(&raw, &aliases()).unwrap_err();
        match err {
            MoleError::IncompleteRangeEntry { chemical, field } => {
                assert_eq!(chemical, "Acetone");
                assert_eq!(field, "ph_max");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rows_without_chemical_are_skipped() {
        let raw = RawTable::from_text_rows(
            &HEADERS,
            &[
                &["", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10"],
                &["Acetone", "10", "50", "6", "8", "15", "30", "90", "110", "2", "8"],
            ],
        );
        let ranges = load_range_table(&raw, &aliases()).unwrap();
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn test_duplicate_chemical_keeps_first() {
        let raw = RawTable::from_text_rows(
            &HEADERS,
            &[
                &["Acetone", "10", "50", "6", "8", "15", "30", "90", "110", "2", "8"],
                &["Acetone", "0", "1", "0", "1", "0", "1", "0", "1", "0", "1"],
            ],
        );
        let ranges = load_range_table(&raw, &aliases()).unwrap();
        assert_eq!(ranges.len(), 1);
        assert_eq!(
            ranges.get("Acetone").unwrap().bounds(Metric::Concentration).max,
            dec!(50)
        );
    }
}
