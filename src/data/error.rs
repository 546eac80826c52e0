/// Errors that can occur while loading or writing a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("column '{name}' appears more than once in the header")]
    DuplicateColumn { name: String },

    #[error("row {row}, column '{column}': cannot parse '{value}': {reason}")]
    Parse {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("row {row}: duplicate filename '{filename}'")]
    DuplicateFilename { row: usize, filename: String },
}

impl CatalogError {
    pub fn schema(missing: Vec<String>) -> Self {
        Self::Schema { missing }
    }

    pub fn parse(
        row: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Parse {
            row,
            column: column.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
