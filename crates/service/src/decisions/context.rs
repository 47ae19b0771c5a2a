//! Per-request deadline carried through every store call.

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use crate::errors::StoreError;

/// Deadline scope for one RPC. `Default` has no deadline.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn background() -> Self { Self::default() }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { deadline: Some(Instant::now() + timeout) }
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Run one store call under the deadline.
    ///
    /// An already expired deadline fails before the call is started; otherwise
    /// the call is dropped (and so cancelled) when the deadline passes.
    pub async fn bound<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.is_expired() {
            return Err(StoreError::DeadlineExceeded);
        }
        let Some(deadline) = self.deadline else { return call.await };
        timeout_at(deadline, call).await.map_err(|_| StoreError::DeadlineExceeded)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn no_deadline_passes_result_through() {
        let ctx = RequestContext::background();
        assert!(!ctx.is_expired());
        let out = ctx.bound(async { Ok::<_, StoreError>(7) }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn expired_deadline_never_starts_the_call() {
        let started = AtomicBool::new(false);
        let ctx = RequestContext::with_timeout(Duration::ZERO);
        let res = ctx
            .bound(async {
                started.store(true, Ordering::SeqCst);
                Ok::<_, StoreError>(())
            })
            .await;
        assert!(matches!(res, Err(StoreError::DeadlineExceeded)));
        assert!(!started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn slow_call_is_cut_off() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(20));
        let res = ctx
            .bound(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, StoreError>(())
            })
            .await;
        assert!(matches!(res, Err(StoreError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn store_errors_are_not_rewritten() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(5));
        let res: Result<(), _> = ctx.bound(async { Err(StoreError::Db("boom".into())) }).await;
        assert!(matches!(res, Err(StoreError::Db(msg)) if msg == "boom"));
    }
}
