use std::{future::Future, time::Duration};

use common::error::{AppError, Res};

/// Bounded retry with exponential backoff. The policy is pure data so
/// call sites stay declarative and tests can drive it without sleeping.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Backoff {
    /// Total attempts, including the first one.
    pub attempts: u32,
    /// Delay before the first retry; doubles for each further retry.
    pub base_delay: Duration,
}

impl Backoff {
    pub(crate) fn delay_for(&self, completed_attempts: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(completed_attempts.saturating_sub(1))
    }
}

/// Whether an error is worth another attempt. Rate limits and quota or
/// auth failures are terminal: retrying them only burns the provider
/// budget faster.
pub(crate) fn is_transient(error: &AppError) -> bool {
    !matches!(
        error,
        AppError::TooManyRequests(_)
            | AppError::PaymentRequired(_)
            | AppError::Unauthorized(_)
            | AppError::Forbidden(_)
            | AppError::BadRequest(_)
    )
}

/// Runs `op` up to `policy.attempts` times, sleeping between attempts,
/// and returns the first success or the last error. Non-transient errors
/// are returned immediately.
pub(crate) async fn with_backoff<T, F, Fut>(policy: Backoff, mut op: F) -> Res<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Res<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if !is_transient(&error) => return Err(error),
            Err(error) => {
                log::warn!("attempt {}/{} failed: {}", attempt, attempts, error);
                last_error = Some(error);
                if attempt < attempts {
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| AppError::Internal("retry loop ran no attempts".to_string())))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn zero_delay(attempts: u32) -> Backoff {
        Backoff {
            attempts,
            base_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(zero_delay(2), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, AppError>(42) }
        })
        .await
        .unwrap();

        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_errors_are_retried_up_to_the_bound() {
        let calls = AtomicU32::new(0);
        let result: Res<()> = with_backoff(zero_delay(2), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::Internal("flaky".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rate_limit_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Res<()> = with_backoff(zero_delay(3), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::TooManyRequests("slow down".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(AppError::TooManyRequests(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = Backoff {
            attempts: 3,
            base_delay: Duration::from_millis(400),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(400));
        assert_eq!(policy.delay_for(2), Duration::from_millis(800));
        assert_eq!(policy.delay_for(3), Duration::from_millis(1600));
    }
}
