use thiserror::Error;

/// Structurally malformed input. Never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Expected {expected} {what}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Invalid slack marker {value} in row {row} (expected -1, 0 or 1)")]
    InvalidSlackMarker { row: usize, value: i8 },
    #[error("Column {column} references row {row}, but there are only {rows} rows")]
    RowOutOfRange {
        column: usize,
        row: usize,
        rows: usize,
    },
    #[error("Column {column} lists row {row} more than once")]
    DuplicateEntry { column: usize, row: usize },
    #[error("Non-finite value in {0}")]
    NonFinite(String),
    #[error("Basis of row {row} names variable {index}, but there are only {columns} columns")]
    BasisOutOfRange {
        row: usize,
        index: usize,
        columns: usize,
    },
    #[error("{rows} independent equations but only {columns} variables")]
    TooManyEquations { rows: usize, columns: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
    /// Row/column selection handed the pivot engine a zero entry
    #[error("Internal invariant violated: zero pivot at row {row}, column {column}")]
    ZeroPivot { row: usize, column: usize },
}
