pub mod csv_reader;
pub mod xlsx;

use crate::error::MoleError;
use crate::parsing::values::parse_metric;
use rust_decimal::Decimal;
use std::fmt;
use std::path::Path;

/// A single cell as read from a source table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(Decimal),
}

impl Cell {
    /// Build a cell from raw text; blank text is `Empty`.
    ///
    /// Non-blank text is kept as written, surrounding whitespace included:
    /// chemical names are matched exactly.
    pub fn from_text(s: &str) -> Cell {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text content, with numbers rendered as written.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    /// Numeric content under the quiet coercion policy of [`parse_metric`].
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => parse_metric(s),
            Cell::Number(n) => Some(*n),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One named source column and its cells, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        RawColumn {
            name: name.into(),
            cells,
        }
    }
}

/// A table as delivered by a reader: ordered columns under their original
/// header names. Nothing is renamed or coerced at this stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<RawColumn>,
}

impl RawTable {
    pub fn new(columns: Vec<RawColumn>) -> Self {
        RawTable { columns }
    }

    /// Build a table from a header row and data rows. Short rows are padded
    /// with empty cells; cells past the last header are dropped.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut columns: Vec<RawColumn> = headers
            .into_iter()
            .map(|name| RawColumn::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(cells.next().unwrap_or_default());
            }
        }

        RawTable { columns }
    }

    /// Convenience for tests and callers holding plain strings.
    pub fn from_text_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        RawTable::from_rows(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| Cell::from_text(s)).collect())
                .collect(),
        )
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
    }

    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Supported on-disk table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    Xlsx,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Option<TableFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(TableFormat::Csv),
            "tsv" => Some(TableFormat::Tsv),
            "xlsx" | "xlsm" => Some(TableFormat::Xlsx),
            _ => None,
        }
    }

    pub fn reader(self) -> Box<dyn TableReader> {
        match self {
            TableFormat::Csv => Box::new(csv_reader::CsvReader::new()),
            TableFormat::Tsv => Box::new(csv_reader::CsvReader::with_delimiter(b'\t')),
            TableFormat::Xlsx => Box::new(xlsx::XlsxReader::new()),
        }
    }
}

/// Trait for table reading backends.
pub trait TableReader: Send + Sync {
    /// Read a whole table from bytes. The first row is the header row.
    fn read_table(&self, bytes: &[u8]) -> Result<RawTable, MoleError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Read a table from disk, picking the backend by file extension.
pub fn read_table_file(path: &Path) -> Result<RawTable, MoleError> {
    let format = TableFormat::from_path(path).ok_or_else(|| MoleError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let bytes = std::fs::read(path)?;
    let reader = format.reader();
    let table = reader.read_table(&bytes)?;
    log::debug!(
        "read {} column(s), {} row(s) from {} via {}",
        table.columns.len(),
        table.row_count(),
        path.display(),
        reader.backend_name()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_rows_pads_short_rows() {
        let table = RawTable::from_text_rows(&["a", "b"], &[&["1"], &["2", "3", "extra"]]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[1].cells[0], Cell::Empty);
        assert_eq!(table.columns[1].cells[1], Cell::Text("3".into()));
    }

    #[test]
    fn test_cell_coercion() {
        assert_eq!(Cell::from_text(" 4,5 ").as_number(), Some(dec!(4.5)));
        assert_eq!(Cell::from_text("n/a").as_number(), None);
        assert_eq!(Cell::Number(dec!(3)).as_text().as_deref(), Some("3"));
        assert!(Cell::from_text("   ").is_empty());
    }

    #[test]
    fn test_text_is_kept_as_written() {
        assert_eq!(
            Cell::from_text("Acetone ").as_text().as_deref(),
            Some("Acetone ")
        );
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            TableFormat::from_path(Path::new("data/Samples.CSV")),
            Some(TableFormat::Csv)
        );
        assert_eq!(
            TableFormat::from_path(Path::new("CompliantRanges.xlsx")),
            Some(TableFormat::Xlsx)
        );
        assert_eq!(TableFormat::from_path(Path::new("report.pdf")), None);
    }

    #[test]
    fn test_unsupported_format_is_an_error() {
        let err = read_table_file(Path::new("ranges.pdf")).unwrap_err();
        assert!(matches!(err, MoleError::UnsupportedFormat { .. }));
    }
}
