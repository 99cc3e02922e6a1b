//! Recurring polling sweep.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

use shiptrack_deliveries::DeliveryResult;

use crate::config::format_interval;
use crate::status_service::PollSummary;
use crate::usecases::PollDeliveryStatusUseCase;

struct Running {
    shutdown: Arc<Notify>,
    join: JoinHandle<()>,
}

/// Runs a polling sweep every `interval` on a background tokio task.
///
/// - Sweeps never overlap: scheduled and `run_once` sweeps take the same
///   guard, and ticks missed while a sweep runs are skipped.
/// - A failed scheduled sweep is logged; the timer keeps going.
/// - `start` on a running task replaces the previous timer.
pub struct DeliveryPollingTask {
    poll: Arc<PollDeliveryStatusUseCase>,
    sweep_guard: Arc<AsyncMutex<()>>,
    running: Mutex<Option<Running>>,
}

impl DeliveryPollingTask {
    pub fn new(poll: Arc<PollDeliveryStatusUseCase>) -> Self {
        Self {
            poll,
            sweep_guard: Arc::new(AsyncMutex::new(())),
            running: Mutex::new(None),
        }
    }

    /// Spawn the timer. The first sweep happens one `interval` from now.
    pub fn start(&self, interval: Duration) {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = running.take() {
            stop_running(previous);
        }

        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting delivery status polling every {}",
            format_interval(interval)
        );

        let shutdown = Arc::new(Notify::new());
        let join = tokio::spawn(sweep_loop(
            self.poll.clone(),
            self.sweep_guard.clone(),
            interval,
            shutdown.clone(),
        ));
        *running = Some(Running { shutdown, join });
    }

    pub fn stop(&self) {
        let previous = self
            .running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(previous) = previous {
            stop_running(previous);
            info!("Delivery status polling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|r| !r.join.is_finished())
    }

    /// One sweep outside the timer. Waits for a scheduled sweep in progress.
    /// Unlike scheduled sweeps, failure is returned.
    pub async fn run_once(&self) -> DeliveryResult<PollSummary> {
        let _sweep = self.sweep_guard.lock().await;
        match self.poll.execute_for_all_active().await {
            Ok(summary) => {
                info!(
                    polled = summary.polled,
                    skipped = summary.skipped,
                    "One-time delivery status polling completed"
                );
                Ok(summary)
            }
            Err(err) => {
                error!(error = %err, "One-time delivery status polling failed");
                Err(err)
            }
        }
    }
}

impl Drop for DeliveryPollingTask {
    fn drop(&mut self) {
        let running = self.running.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = running.take() {
            stop_running(previous);
        }
    }
}

fn stop_running(running: Running) {
    running.shutdown.notify_one();
    running.join.abort();
}

async fn sweep_loop(
    poll: Arc<PollDeliveryStatusUseCase>,
    sweep_guard: Arc<AsyncMutex<()>>,
    period: Duration,
    shutdown: Arc<Notify>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            _ = ticker.tick() => {
                let _sweep = sweep_guard.lock().await;
                match poll.execute_for_all_active().await {
                    Ok(summary) => info!(
                        polled = summary.polled,
                        skipped = summary.skipped,
                        "Delivery status polling completed successfully"
                    ),
                    Err(err) => error!(error = %err, "Delivery status polling failed"),
                }
            }
        }
    }
}
