//! Fixed-cadence capture timer on the tokio runtime.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

/// Stoppable periodic timer. The first tick fires one period after start.
pub struct CaptureTimer {
    task: Option<JoinHandle<()>>,
}

impl CaptureTimer {
    /// Calls `tick` every `period` until it returns `false` or the timer is
    /// stopped.
    pub fn start<F>(runtime: &Handle, period: Duration, tick: F) -> Self
    where
        F: Fn() -> bool + Send + 'static,
    {
        let task = runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if !tick() {
                    break;
                }
            }
        });
        info!(period_ms = period.as_millis() as u64, "capture timer started");
        Self { task: Some(task) }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("capture timer stopped");
        }
    }
}

impl Drop for CaptureTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
