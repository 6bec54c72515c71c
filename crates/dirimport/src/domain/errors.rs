//! Domain-specific errors.

use thiserror::Error;

/// Reasons a submission attempt does not reach the importing controller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Every row was blank or whitespace-only.
    #[error("no directories specified")]
    EmptyDirectoryList,
    /// A previous validation notice has not been acknowledged yet.
    #[error("a validation notice is awaiting acknowledgment")]
    NotificationPending,
    #[error("the directory list was already submitted")]
    AlreadySubmitted,
}

/// Errors raised while decoding a request document received from elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestParseError {
    #[error("request document lists no directories")]
    Empty,
    #[error("directory #{index} is blank")]
    BlankDirectory { index: usize },
    #[error("directory #{index} has surrounding whitespace")]
    UntrimmedDirectory { index: usize },
}
