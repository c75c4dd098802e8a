use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::error::MoleError;
use crate::ingest::{Cell, RawTable, TableReader};
use crate::parsing::values::f64_to_decimal;

/// Spreadsheet backend for `.xlsx` workbooks (via calamine).
///
/// Reads the first worksheet. Row 1 is the header row; fully blank rows are
/// skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxReader;

impl XlsxReader {
    pub fn new() -> Self {
        XlsxReader
    }
}

impl TableReader for XlsxReader {
    fn read_table(&self, bytes: &[u8]) -> Result<RawTable, MoleError> {
        let cursor = Cursor::new(bytes);
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
            .map_err(|e| MoleError::TableRead(format!("failed to open xlsx: {e}")))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| MoleError::TableRead("workbook has no worksheets".into()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| MoleError::TableRead(format!("sheet '{sheet_name}' not readable: {e}")))?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|c| cell_from_data(c).as_text().unwrap_or_default())
                .collect(),
            None => {
                return Err(MoleError::TableRead(format!(
                    "sheet '{sheet_name}' is empty"
                )))
            }
        };

        let data_rows: Vec<Vec<Cell>> = rows
            .map(|row| row.iter().map(cell_from_data).collect::<Vec<Cell>>())
            .filter(|cells| !cells.iter().all(Cell::is_empty))
            .collect();

        Ok(RawTable::from_rows(headers, data_rows))
    }

    fn backend_name(&self) -> &str {
        "xlsx"
    }
}

fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => f64_to_decimal(*f)
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::Text(f.to_string())),
        Data::Int(i) => Cell::Number((*i).into()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        _ => Cell::from_text(&format!("{cell}")),
    }
}
