use crate::error::MoleError;
use crate::ingest::{Cell, RawTable, TableReader};

/// Delimited-text backend built on the `csv` crate.
///
/// Rows may be ragged; short rows are padded with empty cells.
pub struct CsvReader {
    delimiter: u8,
}

impl CsvReader {
    pub fn new() -> Self {
        CsvReader { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        CsvReader { delimiter }
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableReader for CsvReader {
    fn read_table(&self, bytes: &[u8]) -> Result<RawTable, MoleError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .double_quote(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(MoleError::TableRead("CSV input has no header row".into()));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cells: Vec<Cell> = record.iter().map(Cell::from_text).collect();
            if cells.iter().all(Cell::is_empty) {
                continue;
            }
            rows.push(cells);
        }

        Ok(RawTable::from_rows(headers, rows))
    }

    fn backend_name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_headers_and_rows() {
        let input = "Sample ID,Chemical,Concentration (ppm)\nS1,Acetone,30\nS2,Benzene,\n";
        let table = CsvReader::new().read_table(input.as_bytes()).unwrap();
        assert_eq!(
            table.headers(),
            vec!["Sample ID", "Chemical", "Concentration (ppm)"]
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[2].cells[1], Cell::Empty);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let input = "Chemical;pH\nAcetone;7,1\n";
        let table = CsvReader::with_delimiter(b';')
            .read_table(input.as_bytes())
            .unwrap();
        assert_eq!(table.columns[1].cells[0], Cell::Text("7,1".into()));
    }

    #[test]
    fn test_blank_lines_and_ragged_rows() {
        let input = "a,b,c\n1,2\n,,\n4,5,6\n";
        let table = CsvReader::new().read_table(input.as_bytes()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[2].cells[0], Cell::Empty);
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let input = "\u{feff}Chemical,pH\nAcetone,7\n";
        let table = CsvReader::new().read_table(input.as_bytes()).unwrap();
        assert_eq!(table.headers()[0], "Chemical");
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(CsvReader::new().read_table(b"").is_err());
    }
}
