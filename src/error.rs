use thiserror::Error;

/// Failures of the key-value store backing session and settings state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file is not a valid JSON object: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("could not lock store: {0}")]
    Lock(String),
}

/// A unit string that does not name any known unit for its measurement kind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("unknown {kind} unit '{value}'")]
    Unknown { kind: &'static str, value: String },
}
