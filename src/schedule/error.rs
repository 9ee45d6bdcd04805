use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("request to timetable API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered, but with `psrozklad_export.error` set.
    #[error("timetable API error: {message}")]
    Upstream {
        message: String,
        code: Option<String>,
    },

    #[error("unexpected answer from timetable API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}
