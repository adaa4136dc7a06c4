use crate::block::{block_all, BlockOutcome, Blocker};
use crate::retry::retry_transient;
use crate::search::{Cursor, Fetcher, SearchQuery};
use crate::settings::Settings;
use crate::{Error, Result};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Why a run ended without an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopReason {
    /// The search returned no more statuses.
    Exhausted,
    /// The number of searches exceeded the configured limit.
    CeilingReached(usize),
    /// The cancellation flag was set.
    Cancelled,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "No more statuses available"),
            StopReason::CeilingReached(limit) => {
                write!(f, "Reached the search limit ({} searches)", limit)
            }
            StopReason::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Summary {
    pub stop: StopReason,
    pub fetches: usize,
    pub blocked: usize,
    pub failed: usize,
    /// The cursor the next search would have used.
    pub cursor: Cursor,
}

/// The single report for a run that ended because of an error.
#[derive(thiserror::Error, Debug)]
#[error("Unexpected error occurred ({source})")]
pub struct Failure {
    pub iteration: usize,
    #[source]
    pub source: Error,
}

struct IterationState {
    cursor: Cursor,
    fetches: usize,
    blocked: usize,
    failed: usize,
}

impl IterationState {
    fn record(&mut self, outcomes: &[BlockOutcome]) {
        let blocked = outcomes.iter().filter(|outcome| outcome.succeeded).count();
        self.blocked += blocked;
        self.failed += outcomes.len() - blocked;
    }

    fn stop(self, stop: StopReason) -> Summary {
        log::info!("{} after {} searches", stop, self.fetches);

        Summary {
            stop,
            fetches: self.fetches,
            blocked: self.blocked,
            failed: self.failed,
            cursor: self.cursor,
        }
    }
}

/// Walks the search results from newest to oldest, blocking the author of every status found.
pub struct DriveLoop<'a, F: ?Sized, B: ?Sized> {
    fetcher: &'a F,
    blocker: &'a B,
    settings: Settings,
    cancelled: Option<Arc<AtomicBool>>,
}

impl<'a, F: Fetcher + ?Sized, B: Blocker + ?Sized> DriveLoop<'a, F, B> {
    pub fn new(fetcher: &'a F, blocker: &'a B, settings: Settings) -> Result<Self> {
        settings.validate()?;

        Ok(DriveLoop {
            fetcher,
            blocker,
            settings,
            cancelled: None,
        })
    }

    /// Check `flag` before every search and stop once it has been set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::SeqCst))
    }

    /// Run until the search is exhausted, the search limit is exceeded, or an error occurs.
    ///
    /// `on_outcome` is called once for every account the blocker attempted.
    pub async fn run<O: FnMut(&BlockOutcome)>(
        &self,
        query: &SearchQuery,
        mut on_outcome: O,
    ) -> std::result::Result<Summary, Failure> {
        let mut state = IterationState {
            cursor: Cursor::Latest,
            fetches: 0,
            blocked: 0,
            failed: 0,
        };

        for iteration in 0..=self.settings.search_limit {
            if self.is_cancelled() {
                return Ok(state.stop(StopReason::Cancelled));
            }

            let cursor = state.cursor;
            log::debug!(
                "Searching for \"{}\" (iteration {}, max ID {:?})",
                query,
                iteration,
                cursor.max_id()
            );

            let page = retry_transient(self.settings.retries, self.settings.retry_backoff, || {
                self.fetcher.fetch(query, cursor, self.settings.page_size)
            })
            .await
            .map_err(|source| Failure { iteration, source })?;
            state.fetches += 1;

            let fetched = page.len();
            let page = page
                .into_iter()
                .filter(|post| cursor.admits(post.id))
                .collect::<Vec<_>>();

            if page.len() < fetched {
                log::warn!(
                    "Ignoring {} statuses above max ID {:?}",
                    fetched - page.len(),
                    cursor.max_id()
                );
            }

            if page.is_empty() {
                return Ok(state.stop(StopReason::Exhausted));
            }

            let next = Cursor::older_than(&page);
            let screen_names = page
                .into_iter()
                .map(|post| post.author)
                .collect::<Vec<_>>();

            log::debug!("Blocking {}", screen_names.iter().join(", "));

            let outcomes = block_all(
                self.blocker,
                &screen_names,
                &self.settings,
                &mut on_outcome,
            )
            .await
            .map_err(|source| Failure { iteration, source })?;
            state.record(&outcomes);

            match next {
                Some(next) => state.cursor = next,
                None => return Ok(state.stop(StopReason::Exhausted)),
            }
        }

        Ok(state.stop(StopReason::CeilingReached(self.settings.search_limit)))
    }
}
