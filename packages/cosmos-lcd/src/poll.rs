use std::{future::Future, time::Duration};

use crate::Result;

/// Fixed-interval retry loop used to wait for transactions to be indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Poller {
    interval: Duration,
    max_attempts: u32,
}

impl Poller {
    /// Delay between lookups of a broadcast transaction.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Poller {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Enough attempts to cover `timeout`: one immediately, then one per
    /// started interval, i.e. `ceil(timeout / interval) + 1` lookups.
    ///
    /// A timeout that is not a multiple of the interval rounds up, so a 1 ms
    /// timeout with a 500 ms interval makes two lookups and sleeps once.
    /// Callers that want a single lookup with no sleep pass a zero timeout,
    /// or build the poller with [Self::new] and an exact attempt count.
    pub fn with_timeout(interval: Duration, timeout: Duration) -> Self {
        let interval_ms = interval.as_millis().max(1);
        let intervals = (timeout.as_millis() + interval_ms - 1) / interval_ms;
        let max_attempts = u32::try_from(intervals)
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        Poller::new(interval, max_attempts)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Call `attempt` until it produces a value, sleeping between tries.
    ///
    /// `Ok(None)` from `attempt` means not ready yet. Errors stop the loop
    /// immediately. Returns `Ok(None)` once all attempts are used up.
    pub async fn poll<T, F, Fut>(&self, mut attempt: F) -> Result<Option<T>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        for number in 1..=self.max_attempts {
            if let Some(value) = attempt(number).await? {
                return Ok(Some(value));
            }
            if number < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::Error;

    use super::*;

    #[test]
    fn attempts_from_timeout() {
        let interval = Duration::from_millis(500);
        assert_eq!(Poller::with_timeout(interval, Duration::from_millis(1)).max_attempts(), 2);
        assert_eq!(Poller::with_timeout(interval, Duration::ZERO).max_attempts(), 1);
        assert_eq!(Poller::with_timeout(interval, Duration::from_secs(60)).max_attempts(), 121);
        assert_eq!(Poller::with_timeout(interval, Duration::from_millis(1001)).max_attempts(), 4);
        // exact multiples add no extra lookup
        assert_eq!(Poller::with_timeout(interval, Duration::from_millis(1000)).max_attempts(), 3);
        assert_eq!(Poller::new(interval, 1).max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_budget() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let poller = Poller::with_timeout(Poller::DEFAULT_INTERVAL, Duration::from_millis(1));
        let start = tokio::time::Instant::now();
        let res = poller
            .poll(move |_| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<Option<()>, Error>(None)
            })
            .await
            .unwrap();
        assert_eq!(res, None);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        let elapsed = start.elapsed();
        assert!(elapsed >= Poller::DEFAULT_INTERVAL);
        assert!(elapsed < Poller::DEFAULT_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_value_or_error() {
        let poller = Poller::new(Duration::from_secs(1), 10);
        let res = poller
            .poll(|number| async move { Ok(Some(number).filter(|n| *n == 3)) })
            .await
            .unwrap();
        assert_eq!(res, Some(3));

        let counter = AtomicU32::new(0);
        let calls = &counter;
        let err = poller
            .poll(move |_| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<Option<()>, _>(Error::validation("bad hash"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
