pub mod error;
pub mod models;
pub mod pagination;
pub mod traits;

pub use error::{Result, TrackerError};
pub use models::*;
pub use pagination::{fetch_all_pages, DEFAULT_PAGE_SIZE};
pub use traits::IssueTracker;
