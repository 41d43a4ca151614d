// src/utils/timer.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};

use super::liveness::Liveness;

/// Whole seconds spent on an attempt, refreshed once per second by a
/// background task.
///
/// The task exits on `stop()`, when the owning view is torn down, or when the
/// timer is dropped.
#[derive(Debug)]
pub struct ElapsedTimer {
    elapsed: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl ElapsedTimer {
    /// Starts counting from now. Must be called inside a tokio runtime.
    pub fn start(liveness: Liveness) -> Self {
        let elapsed = Arc::new(AtomicU64::new(0));
        let counter = elapsed.clone();
        let started = Instant::now();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !liveness.is_alive() {
                    tracing::debug!("Elapsed timer stopping: view torn down");
                    break;
                }
                counter.store(started.elapsed().as_secs(), Ordering::Relaxed);
            }
        });

        Self {
            elapsed,
            handle: Some(handle),
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timer_counts_seconds() {
        let timer = ElapsedTimer::start(Liveness::new());
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(timer.is_running());
        assert!(timer.elapsed_secs() >= 1);
    }

    #[tokio::test]
    async fn test_stop_ends_the_task() {
        let mut timer = ElapsedTimer::start(Liveness::new());
        timer.stop();

        assert!(!timer.is_running());
    }

    #[tokio::test]
    async fn test_teardown_ends_the_task() {
        let liveness = Liveness::new();
        let timer = ElapsedTimer::start(liveness.clone());
        liveness.teardown();

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_secs(), 0);
    }
}
