use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MoleError {
    #[error("reference table has no chemical column (looked for a chemical-key alias among: {})", headers.join(", "))]
    MissingChemicalKey { headers: Vec<String> },

    #[error("reference table is missing required bound column(s): {}", missing.join(", "))]
    MissingRangeColumns { missing: Vec<String> },

    #[error("reference entry for '{chemical}' has no numeric value for '{field}'")]
    IncompleteRangeEntry { chemical: String, field: String },

    #[error("sample table is missing required column(s): {}; every row was marked UNKNOWN", missing.join(", "))]
    MissingSampleColumns { missing: Vec<String> },

    #[error("failed to load alias config from {path}: {reason}")]
    AliasConfigLoad { path: PathBuf, reason: String },

    #[error("invalid alias config: {0}")]
    AliasConfigInvalid(String),

    #[error("unsupported table format for {path}. Expected .csv, .txt, .xlsx or .xlsm")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read table: {0}")]
    TableRead(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
