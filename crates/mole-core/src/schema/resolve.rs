use crate::ingest::{Cell, RawTable};
use crate::model::{Measurements, Metric, Sample, CHEMICAL, SAMPLE_ID};
use crate::parsing::normalize::normalize_header;
use crate::schema::AliasTable;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

/// What happened to one raw column during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// The column now provides this canonical field.
    Canonical { field: String },
    /// The column matched `field`, but an earlier column already claimed it.
    Shadowed { field: String, claimed_by: String },
    /// No alias matched; the column passes through under its raw name.
    Unmapped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnResolution {
    /// Position in the source table.
    pub index: usize,
    pub raw: String,
    pub key: String,
    pub resolution: Resolution,
}

/// Outcome of resolving a list of raw headers against one alias table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameMap {
    pub columns: Vec<ColumnResolution>,
}

impl RenameMap {
    /// Source position of the column that provides `field`.
    pub fn source_index(&self, field: &str) -> Option<usize> {
        self.columns.iter().find_map(|c| match &c.resolution {
            Resolution::Canonical { field: f } if f == field => Some(c.index),
            _ => None,
        })
    }

    /// Canonical field for the first column named `raw`.
    pub fn canonical_for(&self, raw: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.raw == raw)
            .and_then(|c| match &c.resolution {
                Resolution::Canonical { field } => Some(field.as_str()),
                _ => None,
            })
    }

    /// Raw header that provides `field`.
    pub fn raw_for(&self, field: &str) -> Option<&str> {
        self.source_index(field)
            .and_then(|i| self.columns.iter().find(|c| c.index == i))
            .map(|c| c.raw.as_str())
    }

    /// Canonical fields of `aliases` that no column provides, in schema order.
    pub fn missing(&self, aliases: &AliasTable) -> Vec<String> {
        aliases
            .fields
            .iter()
            .filter(|f| self.source_index(f).is_none())
            .cloned()
            .collect()
    }

    /// Columns that keep their raw name, in original order.
    pub fn passthrough(&self) -> Vec<&ColumnResolution> {
        self.columns
            .iter()
            .filter(|c| !matches!(c.resolution, Resolution::Canonical { .. }))
            .collect()
    }
}

/// Resolve raw headers against an alias table.
///
/// A fold over the headers in source order carrying the set of claimed
/// canonical fields: the first column to reach a field claims it, later
/// columns reaching the same field stay under their raw names.
pub fn resolve<S: AsRef<str>>(raw_columns: &[S], aliases: &AliasTable) -> RenameMap {
    let (map, _claimed) = raw_columns.iter().enumerate().fold(
        (RenameMap::default(), BTreeSet::<String>::new()),
        |(mut map, mut claimed), (index, raw)| {
            let raw = raw.as_ref();
            let key = normalize_header(raw);
            let resolution = match aliases.lookup_key(&key) {
                Some(field) if !claimed.contains(field) => {
                    claimed.insert(field.to_string());
                    Resolution::Canonical {
                        field: field.to_string(),
                    }
                }
                Some(field) => {
                    let claimed_by = map
                        .raw_for(field)
                        .map(str::to_string)
                        .unwrap_or_default();
                    log::debug!("column '{raw}' shadowed: '{field}' already provided by '{claimed_by}'");
                    Resolution::Shadowed {
                        field: field.to_string(),
                        claimed_by,
                    }
                }
                None => Resolution::Unmapped,
            };
            map.columns.push(ColumnResolution {
                index,
                raw: raw.to_string(),
                key,
                resolution,
            });
            (map, claimed)
        },
    );
    map
}

/// A column of a resolved table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    /// Canonical field, or the raw header for pass-through columns.
    pub name: String,
    /// Raw header it came from; `None` for a canonical field created empty.
    pub source: Option<String>,
    pub cells: Vec<Cell>,
}

/// A table renamed onto a canonical schema.
///
/// Canonical columns come first in schema order, every one present (absent
/// fields are created holding empty cells), followed by pass-through
/// columns in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    pub columns: Vec<ResolvedColumn>,
    /// Canonical fields no source column provided.
    pub missing: Vec<String>,
    pub rename: RenameMap,
    pub row_count: usize,
}

impl ResolvedTable {
    pub fn from_raw(table: &RawTable, aliases: &AliasTable) -> ResolvedTable {
        let rename = resolve(&table.headers(), aliases);
        let row_count = table.row_count();
        let padded = |cells: &[Cell]| -> Vec<Cell> {
            let mut v = cells.to_vec();
            v.resize(row_count, Cell::Empty);
            v
        };

        let mut columns = Vec::with_capacity(table.columns.len() + aliases.fields.len());
        for field in &aliases.fields {
            let column = match rename.source_index(field) {
                Some(i) => ResolvedColumn {
                    name: field.clone(),
                    source: Some(table.columns[i].name.clone()),
                    cells: padded(&table.columns[i].cells),
                },
                None => ResolvedColumn {
                    name: field.clone(),
                    source: None,
                    cells: vec![Cell::Empty; row_count],
                },
            };
            columns.push(column);
        }
        for pass in rename.passthrough() {
            let raw = &table.columns[pass.index];
            columns.push(ResolvedColumn {
                name: raw.name.clone(),
                source: Some(raw.name.clone()),
                cells: padded(&raw.cells),
            });
        }

        let missing = rename.missing(aliases);
        if !missing.is_empty() {
            log::debug!("canonical field(s) absent from source: {}", missing.join(", "));
        }

        ResolvedTable {
            columns,
            missing,
            rename,
            row_count,
        }
    }

    /// Resolve a sample table and coerce its metric columns to numbers.
    pub fn samples_from_raw(table: &RawTable, aliases: &AliasTable) -> ResolvedTable {
        let mut resolved = ResolvedTable::from_raw(table, aliases);
        let fields: Vec<&str> = Metric::ALL.iter().map(|m| m.field()).collect();
        resolved.coerce_numeric(&fields);
        resolved
    }

    /// Replace the cells of the named canonical columns with their numeric
    /// value, or an empty cell where the value does not parse.
    pub fn coerce_numeric(&mut self, fields: &[&str]) {
        let canonical_count = self.columns.len() - self.rename.passthrough().len();
        for column in self.columns[..canonical_count]
            .iter_mut()
            .filter(|c| fields.contains(&c.name.as_str()))
        {
            for cell in column.cells.iter_mut() {
                *cell = match cell.as_number() {
                    Some(n) => Cell::Number(n),
                    None => Cell::Empty,
                };
            }
        }
    }

    /// Canonical column by field name.
    pub fn column(&self, field: &str) -> Option<&ResolvedColumn> {
        self.columns.iter().find(|c| c.name == field)
    }

    /// True when no source column provided `field`.
    pub fn is_missing(&self, field: &str) -> bool {
        self.missing.iter().any(|m| m == field)
    }

    pub fn cell(&self, field: &str, row: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.column(field)
            .and_then(|c| c.cells.get(row))
            .unwrap_or(EMPTY)
    }

    pub fn text(&self, field: &str, row: usize) -> Option<String> {
        self.cell(field, row).as_text()
    }

    pub fn number(&self, field: &str, row: usize) -> Option<Decimal> {
        self.cell(field, row).as_number()
    }

    /// Build one [`Sample`] per row, in row order.
    pub fn to_samples(&self) -> Vec<Sample> {
        (0..self.row_count)
            .map(|row| Sample {
                sample_id: self.text(SAMPLE_ID, row),
                chemical: self.text(CHEMICAL, row),
                measurements: Measurements::from_fn(|m| self.number(m.field(), row)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::builtin::default_config;
    use rust_decimal_macros::dec;

    fn sample_aliases() -> AliasTable {
        default_config().unwrap().sample
    }

    #[test]
    fn test_first_column_wins() {
        let map = resolve(&["pH", "pH Level", "Chemical"], &sample_aliases());
        assert_eq!(map.canonical_for("pH"), Some("ph"));
        assert_eq!(map.canonical_for("pH Level"), None);
        assert_eq!(
            map.columns[1].resolution,
            Resolution::Shadowed {
                field: "ph".into(),
                claimed_by: "pH".into()
            }
        );
        assert_eq!(map.source_index("chemical"), Some(2));
    }

    #[test]
    fn test_tie_break_follows_source_order() {
        let map = resolve(&["pH Level", "pH"], &sample_aliases());
        assert_eq!(map.raw_for("ph"), Some("pH Level"));
    }

    #[test]
    fn test_unmapped_columns_pass_through_in_order() {
        let map = resolve(&["Notes", "Chemical", "Operator"], &sample_aliases());
        let pass: Vec<&str> = map.passthrough().iter().map(|c| c.raw.as_str()).collect();
        assert_eq!(pass, vec!["Notes", "Operator"]);
    }

    #[test]
    fn test_missing_fields_in_schema_order() {
        let map = resolve(&["Chemical", "Temperature (°C)"], &sample_aliases());
        assert_eq!(
            map.missing(&sample_aliases()),
            vec![
                "sample_id",
                "concentration_ppm",
                "ph",
                "pressure_kpa",
                "flow_rate_l_min"
            ]
        );
    }

    #[test]
    fn test_resolved_table_layout() {
        let raw = RawTable::from_text_rows(
            &["Notes", "Chemical", "Conc", "pH"],
            &[&["a", "Acetone", "30", "7"]],
        );
        let resolved = ResolvedTable::samples_from_raw(&raw, &sample_aliases());
        let names: Vec<&str> = resolved.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "sample_id",
                "chemical",
                "concentration_ppm",
                "ph",
                "temperature_celsius",
                "pressure_kpa",
                "flow_rate_l_min",
                "Notes"
            ]
        );
        assert!(resolved.is_missing("pressure_kpa"));
        assert!(!resolved.is_missing("ph"));
        assert_eq!(resolved.column("pressure_kpa").unwrap().cells, vec![Cell::Empty]);
    }

    #[test]
    fn test_quiet_numeric_coercion() {
        let raw = RawTable::from_text_rows(
            &["Chemical", "Concentration", "pH"],
            &[&["Acetone", "thirty", "7,2"], &["Acetone", "", "n/a"]],
        );
        let resolved = ResolvedTable::samples_from_raw(&raw, &sample_aliases());
        assert_eq!(resolved.cell("concentration_ppm", 0), &Cell::Empty);
        assert_eq!(resolved.cell("ph", 0), &Cell::Number(dec!(7.2)));
        assert_eq!(resolved.cell("ph", 1), &Cell::Empty);
        assert_eq!(resolved.cell("chemical", 1), &Cell::Text("Acetone".into()));
    }

    #[test]
    fn test_passthrough_cells_are_not_coerced() {
        let raw = RawTable::from_text_rows(&["Chemical", "Batch"], &[&["Acetone", "B-7"]]);
        let resolved = ResolvedTable::samples_from_raw(&raw, &sample_aliases());
        assert_eq!(
            resolved.column("Batch").unwrap().cells,
            vec![Cell::Text("B-7".into())]
        );
    }

    #[test]
    fn test_to_samples() {
        let raw = RawTable::from_text_rows(
            &["Sample ID", "Chemical", "Concentration (ppm)", "pH"],
            &[&["S-1", "Acetone", "30", "bad"]],
        );
        let samples = ResolvedTable::samples_from_raw(&raw, &sample_aliases()).to_samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].sample_id.as_deref(), Some("S-1"));
        assert_eq!(samples[0].chemical.as_deref(), Some("Acetone"));
        assert_eq!(samples[0].measurements.concentration, Some(dec!(30)));
        assert_eq!(samples[0].measurements.ph, None);
        assert_eq!(samples[0].measurements.flow_rate, None);
    }
}
