use thiserror::Error;

/// Application errors, split the way the UI treats them: validation
/// failures are local and block the action before any network call,
/// store failures are surfaced as-is with no retry and no
/// partial-success state.
#[derive(Debug, Error)]
pub enum AppError {
    /// User input failed validation; the store was never contacted
    #[error("invalid input: {0}")]
    Validation(String),

    /// The remote store answered with a non-success status
    #[error("store error ({status}): {message}")]
    Store { status: u16, message: String },

    /// The remote store could not be reached at all
    #[error("network error: {0}")]
    Transport(String),

    /// No entry with the given id exists
    #[error("no entry with id {0}")]
    NotFound(i64),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl AppError {
    /// True for errors the user fixes by correcting their input.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}
