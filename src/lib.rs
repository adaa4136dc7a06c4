pub mod block;
pub mod cli;
pub mod drive;
mod error;
mod retry;
pub mod search;
pub mod settings;
pub mod twitter;

pub use block::{BlockOutcome, Blocker};
pub use drive::{DriveLoop, Failure, StopReason, Summary};
pub use error::Error;
pub use search::{Cursor, Fetcher, Page, Post, SearchQuery};
pub use settings::{BlockFailurePolicy, Settings};

pub type Result<T> = std::result::Result<T, Error>;
