use std::io::Read;
use std::path::Path;
use crate::data::error::{LoadError, ParseError};
use crate::data::parser;
use crate::data::replicates::ReplicateSet;

/// Extensions accepted by the file dialog and by drag-and-drop.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

/// A tabular file read as raw strings. The first row supplies the column names.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub columns: Vec<String>,
    pub column_data: Vec<Vec<String>>,  // column-major: column_data[col_idx][row_idx]
    pub row_count: usize,
}

impl LoadedTable {
    /// Build a table from raw rows, treating the first row as the header.
    pub fn from_rows(all_rows: Vec<Vec<String>>) -> Result<Self, LoadError> {
        let mut rows = all_rows.into_iter();
        let columns: Vec<String> = rows
            .next()
            .ok_or(LoadError::NoData)?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        let num_cols = columns.len();
        let mut column_data: Vec<Vec<String>> = vec![Vec::new(); num_cols];
        let mut row_count = 0usize;

        for row in rows {
            for (col_idx, col_data) in column_data.iter_mut().enumerate() {
                col_data.push(row.get(col_idx).cloned().unwrap_or_default());
            }
            row_count += 1;
        }

        Ok(Self { columns, column_data, row_count })
    }

    /// Names of the numeric-typed columns, in file order.
    ///
    /// A column is numeric when it has at least one value and every
    /// non-missing cell is a finite number.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .zip(&self.column_data)
            .filter(|(_, data)| is_numeric_column(data))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Read the replicate weights from a numeric column, dropping missing cells.
    pub fn replicates(&self, column: &str) -> Result<ReplicateSet, ParseError> {
        if self.numeric_columns().is_empty() {
            return Err(ParseError::NoNumericColumn);
        }

        let idx = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| ParseError::UnknownColumn(column.to_string()))?;
        let data = &self.column_data[idx];
        if !is_numeric_column(data) {
            return Err(ParseError::ColumnNotNumeric(column.to_string()));
        }

        let values: Vec<f64> = data
            .iter()
            .filter(|cell| !parser::is_missing(cell))
            .filter_map(|cell| parser::parse_cell(cell))
            .collect();
        ReplicateSet::new(values)
    }
}

fn is_numeric_column(data: &[String]) -> bool {
    let mut present = data.iter().filter(|cell| !parser::is_missing(cell)).peekable();
    present.peek().is_some() && present.all(|cell| parser::parse_cell(cell).is_some())
}

/// Load a CSV or Excel file.
pub fn load_file(path: &Path) -> Result<LoadedTable, LoadError> {
    let ext = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let table = match ext.as_str() {
        "csv" => load_csv(std::fs::File::open(path)?),
        "xls" | "xlsx" => load_excel(path),
        _ => Err(LoadError::UnsupportedFormat(ext)),
    }?;

    tracing::info!(
        "Loaded {:?}: {} columns, {} rows",
        path,
        table.columns.len(),
        table.row_count
    );
    Ok(table)
}

/// Read comma-separated data from any reader.
pub fn load_csv<R: Read>(mut source: R) -> Result<LoadedTable, LoadError> {
    let mut content = Vec::new();
    source.read_to_end(&mut content)?;

    // Fall back to latin1 (each byte maps to the same code point) for non-UTF-8 exports.
    let text = String::from_utf8(content)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut all_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        all_rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    LoadedTable::from_rows(all_rows)
}

fn load_excel(path: &Path) -> Result<LoadedTable, LoadError> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook.sheet_names().first()
        .ok_or(LoadError::NoData)?
        .clone();

    let range = workbook.worksheet_range(&sheet_name)?;

    let all_rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(excel_cell_text).collect())
        .collect();

    LoadedTable::from_rows(all_rows)
}

/// Render a worksheet cell the way it would appear in a CSV export.
///
/// Date cells are written as calendar dates, never as day serials, so a date
/// column is not mistaken for weights.
fn excel_cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(date) => date.to_string(),
            None => format!("#DATE({dt})"),
        },
        Data::Error(e) => format!("{e:?}"),
    }
}
