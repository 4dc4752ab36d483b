use std::time::Duration;

/// A simple retry policy with exponential backoff and jitter.
///
/// Only idempotent reads should be routed through it, and only errors the
/// caller marks as retryable are retried.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub async fn retry_async<F, Fut, T, E, P>(&self, mut f: F, retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !retryable(&e) {
                        return Err(e);
                    }
                    // exponential backoff with jitter
                    let max_delay = self.base_delay * (1u32 << attempt.min(16));
                    let max_ms = (max_delay.as_millis() as u64).max(1);
                    let delay = Duration::from_millis(rand::random_range(0..max_ms));
                    tracing::debug!(attempt, ?delay, error = %e, "retrying store read");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
