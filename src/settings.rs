use crate::{Error, Result};
use std::time::Duration;

/// The largest page size the search endpoint accepts.
pub const MAX_PAGE_SIZE: u8 = 100;
/// Search requests allowed per user token in one rate limit window.
pub const DEFAULT_SEARCH_LIMIT: usize = 180;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// What to do when blocking a single account fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlockFailurePolicy {
    /// Stop the batch and end the run.
    Abort,
    /// Record the failure and continue with the next account.
    Skip,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub page_size: u8,
    pub search_limit: usize,
    pub retries: u32,
    pub retry_backoff: Duration,
    pub block_failures: BlockFailurePolicy,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            Err(Error::InvalidSettings(format!(
                "Page size must be between 1 and {} (got {})",
                MAX_PAGE_SIZE, self.page_size
            )))
        } else {
            Ok(())
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            page_size: MAX_PAGE_SIZE,
            search_limit: DEFAULT_SEARCH_LIMIT,
            retries: 0,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            block_failures: BlockFailurePolicy::Abort,
        }
    }
}
