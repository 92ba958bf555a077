use thiserror::Error;

/// Common errors for all issue tracker backends
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The tracker refused to create a resource because one with the same name exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl TrackerError {
    /// Whether the failure is likely to go away on its own (rate limits,
    /// server-side errors, transport failures).
    pub fn is_transient(&self) -> bool {
        match self {
            TrackerError::RateLimited | TrackerError::Http(_) | TrackerError::Io(_) => true,
            TrackerError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether the tracker signalled a naming conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, TrackerError::AlreadyExists(_))
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
