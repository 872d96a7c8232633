//! Single-slot trailing-edge debouncer.

use std::{
    future::Future,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::task::JoinHandle;

/// Holds at most one pending firing. Arming again before the delay elapses
/// aborts the pending firing and starts a fresh one.
///
/// Only the wait is cancellable: once the delay has elapsed the task is
/// detached, so re-arming never cancels work that already started.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: Mutex::new(None) }
    }

    /// Run `task` after the quiet period unless re-armed first.
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });

        let previous = self.slot().replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Drop the pending firing, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.slot().take() {
            pending.abort();
        }
    }

    /// True while a firing is armed and its delay has not elapsed.
    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn counter_task(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_task(&fired));
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_pending_firing() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_task(&first));
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.schedule(counter_task(&second));

        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_firing() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_task(&fired));
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_does_not_cancel_started_work() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let finished = Arc::new(AtomicUsize::new(0));

        let done = Arc::clone(&finished);
        debouncer.schedule(async move {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            done.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule(async {});

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
