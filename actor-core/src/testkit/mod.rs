use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

pub mod probe;

/// Retries `assertion` every `interval` until it succeeds or `max` has elapsed, in
/// which case the last failure is returned.
pub async fn await_assert<F, Fut>(mut assertion: F, max: Duration, interval: Duration) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let deadline = Instant::now() + max;
    loop {
        match assertion().await {
            Ok(()) => return Ok(()),
            Err(error) => {
                if Instant::now() + interval > deadline {
                    return Err(error.context(format!("assertion still failing after {:?}", max)));
                }
            }
        }
        tokio::time::sleep(interval).await;
    }
}
