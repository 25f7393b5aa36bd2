//! Error types for the schedule library
//!
//! The CLI wraps these in `anyhow` at the boundary.

use thiserror::Error;

/// Errors raised by registry and navigation operations
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Please fill in the course {0}.")]
    MissingField(&'static str),

    #[error("week {0} is outside the term (1-{max})", max = crate::types::TERM_WEEKS)]
    WeekOutOfRange(u8),

    #[error("weeks must be given as a list such as 1-9,12 within 1-{max}", max = crate::types::TERM_WEEKS)]
    InvalidWeeks,

    #[error("no course with id '{0}'")]
    UnknownCourse(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A mutation hook (usually persistence) failed after the change was applied
    #[error(transparent)]
    Hook(#[from] anyhow::Error),
}

/// Errors raised by the key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while requesting a schedule suggestion
///
/// All variants collapse into one user-facing notice; the variants exist
/// for logging.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("a suggestion request is already in flight")]
    Busy,

    #[error("no API key configured")]
    MissingApiKey,

    #[error("request to suggestion service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("suggestion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("suggestion response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("suggestion response was malformed: {0}")]
    Malformed(String),

    #[error("could not apply suggestion: {0}")]
    Apply(#[from] ScheduleError),
}

impl SuggestError {
    /// The single notice shown to the user for any failure
    pub fn user_notice(&self) -> &'static str {
        match self {
            SuggestError::Busy => "A sync is already running.",
            _ => "Sync failed.",
        }
    }
}
