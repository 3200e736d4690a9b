use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LoanError {
    /// The request does not describe a calculation the calculator can run.
    #[error("Incorrect parameters: {0}")]
    Parameter(String),

    /// The inputs are accepted but the formula is undefined for them.
    #[error("{operation} is undefined: {reason}")]
    Domain {
        operation: &'static str,
        reason: String,
    },
}

impl LoanError {
    pub(crate) fn parameter(reason: impl Into<String>) -> Self {
        LoanError::Parameter(reason.into())
    }

    pub(crate) fn domain(operation: &'static str, reason: impl Into<String>) -> Self {
        LoanError::Domain {
            operation,
            reason: reason.into(),
        }
    }
}

pub type CalcResult<T> = Result<T, LoanError>;
