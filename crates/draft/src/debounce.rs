//! A standalone trailing-edge debounce primitive.
//!
//! Collapses a burst of rapid `schedule` calls into a single deferred run
//! of the latest job. Independent of any presentation-layer lifecycle:
//! the pending slot is a generation counter, and superseded timers wake
//! and no-op rather than being aborted, so a job that has already started
//! is never cancelled mid-execution.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Trailing-edge debouncer: only the last job scheduled within a window
/// actually runs.
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The configured debounce window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `job` to run once the window elapses without a newer call.
    ///
    /// Fire-and-forget: never blocks the caller. A call arriving while a
    /// previous timer is pending supersedes it; the stale timer still
    /// wakes, sees it has been outpaced, and does nothing.
    pub fn schedule<F, Fut>(&self, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let scheduled = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let window = self.window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if generation.load(Ordering::SeqCst) == scheduled {
                job().await;
            }
        });
    }

    /// Invalidate any pending scheduled job without running it.
    ///
    /// A job already past its generation check is unaffected.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::{advance, sleep};

    #[tokio::test(start_paused = true)]
    async fn burst_coalesces_to_one_run() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));

        // Five schedules within a 100ms span.
        for i in 1..=5 {
            let runs = Arc::clone(&runs);
            let last = Arc::clone(&last);
            debouncer.schedule(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                last.store(i, Ordering::SeqCst);
            });
            sleep(Duration::from_millis(20)).await;
        }

        sleep(Duration::from_millis(600)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_calls_each_run() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let runs = Arc::clone(&runs);
            debouncer.schedule(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            // Longer than the window: the timer fires before the next call.
            sleep(Duration::from_millis(700)).await;
        }

        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_runs_before_the_window_elapses() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let runs = Arc::new(AtomicUsize::new(0));

        let counted = Arc::clone(&runs);
        debouncer.schedule(move || async move {
            counted.fetch_add(1, Ordering::SeqCst);
        });
        // Let the spawned timer register its sleep before advancing the
        // paused clock; `advance` moves time first and yields after.
        tokio::task::yield_now().await;

        advance(Duration::from_millis(400)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        advance(Duration::from_millis(200)).await;
        // One more yield so the now-expired timer's task gets to run
        // its job before we observe the counter.
        tokio::task::yield_now().await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_the_pending_job() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let runs = Arc::new(AtomicUsize::new(0));

        let counted = Arc::clone(&runs);
        debouncer.schedule(move || async move {
            counted.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        sleep(Duration::from_millis(600)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
