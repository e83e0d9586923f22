use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A cancellable once-per-second timer scoped to the exposure and reflection
/// stages.
///
/// `start` spawns a single background task that invokes the callback every
/// second; `stop` aborts it. Starting an already-running ticker is a no-op, so
/// repeated enter/exit cycles through the timed stages can never stack
/// duplicate timers. The task is also aborted on drop, covering abrupt
/// teardown of the owning flow.
#[derive(Debug, Default)]
pub struct SessionTicker {
    handle: Option<JoinHandle<()>>,
}

impl SessionTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Begin ticking, invoking `on_tick` once per elapsed second.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, mut on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        if self.is_running() {
            return;
        }

        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of a tokio interval completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                on_tick();
            }
        }));
    }

    /// Cancel the timer. Safe to call when not running.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for SessionTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second() {
        let count = Arc::new(AtomicU64::new(0));
        let mut ticker = SessionTicker::new();

        let counter = Arc::clone(&count);
        ticker.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_future_ticks() {
        let count = Arc::new(AtomicU64::new(0));
        let mut ticker = SessionTicker::new();

        let counter = Arc::clone(&count);
        ticker.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        ticker.stop();
        assert!(!ticker.is_running());

        let before = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), before);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_while_running_does_not_stack_timers() {
        let count = Arc::new(AtomicU64::new(0));
        let mut ticker = SessionTicker::new();

        for _ in 0..3 {
            let counter = Arc::clone(&count);
            ticker.start(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_then_start_resumes_cleanly() {
        let count = Arc::new(AtomicU64::new(0));
        let mut ticker = SessionTicker::new();

        let counter = Arc::clone(&count);
        ticker.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        ticker.stop();

        let counter = Arc::clone(&count);
        ticker.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
