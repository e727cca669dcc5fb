use thiserror::Error;

/// Errors surfaced by the checked descriptor entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}
