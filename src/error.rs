//! Error taxonomy shared by the normalizer, the selection engine and the
//! upstream providers.

use std::fmt;

/// Result type for duration calculator operations
pub type Result<T> = std::result::Result<T, DomainError>;

/// Error types surfaced to the user at the point of the triggering action
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input produced no extractable identifier; upstream is never contacted
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Upstream succeeded but listed zero parts
    #[error("no parts found for {}", .bvid.as_deref().unwrap_or("this video"))]
    EmptyResult { bvid: Option<String> },

    /// A click-to-select update would break `from <= to`
    #[error("{0}")]
    RangeConstraint(RangeViolation),

    #[error("part index {index} is out of range ({count} parts loaded)")]
    UnknownPart { index: usize, count: usize },

    #[error("a search is already in progress")]
    SearchInFlight,
}

/// Failures of the metadata collaborator
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Connection failure or timeout
    #[error("cannot reach metadata service: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("metadata service returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// HTTP 200 with a non-zero platform code
    #[error("platform API error: {message} (code: {code})")]
    Api { code: i64, message: String },

    #[error("failed to decode metadata response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeViolation {
    StartAfterEnd,
    EndBeforeStart,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeViolation::StartAfterEnd => write!(f, "start cannot exceed end"),
            RangeViolation::EndBeforeStart => write!(f, "end cannot precede start"),
        }
    }
}

impl DomainError {
    /// Empty results are reported like upstream failures in the UI
    pub fn is_upstream(&self) -> bool {
        matches!(self, DomainError::Upstream(_) | DomainError::EmptyResult { .. })
    }
}
