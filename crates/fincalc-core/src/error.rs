use thiserror::Error;

/// Every failure the engine can report is a rejected input: it performs no
/// I/O and has no partial-failure modes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinCalcError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl FinCalcError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FinCalcError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
