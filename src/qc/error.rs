use thiserror::Error;

/// Reasons a single allele cannot be reduced to a quality report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QcError {
    /// A required per-position map has no entries
    #[error("Insufficient data: {field} is empty")]
    InsufficientData { field: &'static str },

    /// No numeric depth is left once sentinel entries are removed
    #[error("Cannot compute {metric}: no depth values remain after removing sentinels")]
    EmptyDepth { metric: &'static str },

    /// Input violates the coordinate contract
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },
}

impl QcError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        QcError::MalformedInput {
            reason: reason.into(),
        }
    }
}
