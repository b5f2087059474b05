//! Library-level error types.
//!
//! Per-row parse failures are not errors: rows yield an explicit skip
//! outcome in the assembler. Only source-level problems surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input cannot be analyzed: unsupported type, unresolved required
    /// columns, no extractable tables. Maps to a 400 response.
    #[error("{0}")]
    Validation(String),

    /// Anything unexpected during assembly/aggregation. Maps to a 500
    /// response with the raw text attached as a diagnostic.
    #[error("{0}")]
    Unexpected(String),
}
