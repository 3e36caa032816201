use thiserror::Error;

/// Reasons raw input could not be turned into a replicate sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("The file does not contain any numeric column.")]
    NoNumericColumn,

    #[error("'{0}' is not a number. Enter only numbers separated by commas.")]
    InvalidNumericToken(String),

    #[error("No values were entered.")]
    Empty,

    #[error("Column '{0}' does not exist in the file.")]
    UnknownColumn(String),

    #[error("Column '{0}' is not numeric.")]
    ColumnNotNumeric(String),
}

/// Reasons a tabular file could not be read at all.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot read spreadsheet: {0}")]
    Excel(#[from] calamine::Error),

    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("No data found in file")]
    NoData,
}
