//! One-shot background loads with a cached result.
//!
//! A [`Loader`] runs its fetch at most once at a time on the tokio runtime and
//! keeps the outcome, so asking again hands back the same result instead of
//! hitting the catalog a second time.

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Fetch<T> = Arc<dyn Fn() -> BoxFuture<'static, T> + Send + Sync>;

pub struct Loader<T> {
    fetch: Fetch<T>,
    in_flight: Option<JoinHandle<T>>,
    cached: Option<T>,
}

impl<T: Send + 'static> Loader<T> {
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move || Box::pin(fetch())),
            in_flight: None,
            cached: None,
        }
    }

    /// Spawns the fetch unless a result is cached or one is already running.
    pub fn start(&mut self) {
        if self.cached.is_some() || self.in_flight.is_some() {
            return;
        }
        debug!("loader started");
        self.in_flight = Some(tokio::spawn((self.fetch)()));
    }

    /// The cached result, waiting for the running fetch first if needed.
    ///
    /// `None` when nothing was started or the fetch was cancelled.
    pub async fn result(&mut self) -> Option<&T> {
        if self.cached.is_none() {
            let handle = self.in_flight.take()?;
            match handle.await {
                Ok(value) => self.cached = Some(value),
                Err(e) if e.is_cancelled() => {
                    debug!("loader fetch was cancelled");
                    return None;
                }
                Err(e) => {
                    warn!(error = %e, "loader fetch panicked");
                    return None;
                }
            }
        }
        self.cached.as_ref()
    }

    /// Cancels the running fetch. It is not restarted until [`Loader::start`].
    pub fn stop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            debug!("loader stopped");
        }
    }

    /// Stops any running fetch and forgets the cached result.
    pub fn reset(&mut self) {
        self.stop();
        self.cached = None;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub fn cached(&self) -> Option<&T> {
        self.cached.as_ref()
    }
}

impl<T> Drop for Loader<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_loader(calls: Arc<AtomicUsize>, delay: Duration) -> Loader<usize> {
        Loader::new(move || {
            let calls = calls.clone();
            async move {
                tokio::time::sleep(delay).await;
                calls.fetch_add(1, Ordering::SeqCst) + 1
            }
        })
    }

    #[tokio::test]
    async fn result_is_redelivered_without_refetching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut loader = counting_loader(calls.clone(), Duration::ZERO);

        loader.start();
        loader.start();
        assert_eq!(loader.result().await, Some(&1));

        loader.start();
        assert_eq!(loader.result().await, Some(&1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn nothing_started_yields_none() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut loader = counting_loader(calls.clone(), Duration::ZERO);
        assert!(loader.result().await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stopped_fetch_yields_none() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut loader = counting_loader(calls.clone(), Duration::from_secs(60));

        loader.start();
        assert!(loader.is_loading());
        loader.stop();

        assert!(loader.result().await.is_none());
        assert!(!loader.is_loading());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reset_forces_a_new_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut loader = counting_loader(calls.clone(), Duration::ZERO);

        loader.start();
        assert_eq!(loader.result().await, Some(&1));

        loader.reset();
        assert!(loader.cached().is_none());

        loader.start();
        assert_eq!(loader.result().await, Some(&2));
    }
}
