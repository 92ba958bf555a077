use thiserror::Error;
use tracker_core::TrackerError;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Label already exists: {0}")]
    LabelExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for TrackerError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => TrackerError::Http(e.to_string()),
            GitHubError::Parse(e) => TrackerError::Parse(e.to_string()),
            e @ GitHubError::Timestamp { .. } => TrackerError::Parse(e.to_string()),
            GitHubError::LabelExists(name) => TrackerError::AlreadyExists(name),
            GitHubError::NotFound(what) => TrackerError::NotFound(what),
            GitHubError::Unauthorized => TrackerError::Unauthorized,
            GitHubError::RateLimited => TrackerError::RateLimited,
            GitHubError::Api { status, message } => TrackerError::Api { status, message },
        }
    }
}
