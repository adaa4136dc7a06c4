use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tryhard::RetryPolicy;

/// Run `f` once, repeating it up to `retries` more times while it fails with a transient error.
///
/// The delay doubles after every attempt, starting at `backoff_base`.
pub(crate) async fn retry_transient<T, F, Fut>(
    retries: u32,
    backoff_base: Duration,
    f: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    tryhard::retry_fn(f)
        .retries(retries)
        .custom_backoff(move |attempt: u32, error: &Error| {
            if error.is_transient() {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                let delay = backoff_base.saturating_mul(factor);
                log::warn!("Retrying after transient error ({}): {}", attempt, error);
                RetryPolicy::Delay(delay)
            } else {
                RetryPolicy::Break
            }
        })
        .await
}
