use crate::retry::retry_transient;
use crate::settings::{BlockFailurePolicy, Settings};
use crate::{Error, Result};
use futures::future::LocalBoxFuture;

/// Something that can block accounts by screen name.
pub trait Blocker {
    fn block<'a>(&'a self, screen_name: &'a str) -> LocalBoxFuture<'a, Result<()>>;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockOutcome {
    pub screen_name: String,
    pub succeeded: bool,
}

impl BlockOutcome {
    fn new(screen_name: &str, succeeded: bool) -> BlockOutcome {
        BlockOutcome {
            screen_name: screen_name.to_string(),
            succeeded,
        }
    }
}

/// Block every account in `screen_names`, in order and once per occurrence.
///
/// With [`BlockFailurePolicy::Abort`] the first failure ends the batch and is returned. With
/// [`BlockFailurePolicy::Skip`] a rejection of a single account is recorded as an unsuccessful
/// outcome, but errors that would affect every account (transport, credentials, rate limits,
/// malformed responses) still end the batch.
pub async fn block_all<B, F>(
    blocker: &B,
    screen_names: &[String],
    settings: &Settings,
    mut on_outcome: F,
) -> Result<Vec<BlockOutcome>>
where
    B: Blocker + ?Sized,
    F: FnMut(&BlockOutcome),
{
    let mut outcomes = Vec::with_capacity(screen_names.len());

    for screen_name in screen_names {
        let result = retry_transient(settings.retries, settings.retry_backoff, || {
            blocker.block(screen_name)
        })
        .await;

        let outcome = match result {
            Ok(()) => {
                log::info!("Blocked @{}", screen_name);
                BlockOutcome::new(screen_name, true)
            }
            Err(error @ Error::Api(_)) if settings.block_failures == BlockFailurePolicy::Skip => {
                log::warn!("Failed to block @{}: {}", screen_name, error);
                BlockOutcome::new(screen_name, false)
            }
            Err(error) => return Err(error),
        };

        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
