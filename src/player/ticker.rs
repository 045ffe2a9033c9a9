use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Produces ticks until cancelled.
///
/// The controller owns the receiving side and feeds each tick to the engine, so
/// the engine itself never sees a clock.
pub trait TickSource: Send + Sync + 'static {
    fn start(&self, cancel: CancellationToken) -> mpsc::Receiver<()>;
}

/// Wall-clock ticks at a fixed period. The first tick arrives one full period
/// after start.
#[derive(Debug, Clone)]
pub struct IntervalTickSource {
    period: Duration,
}

impl IntervalTickSource {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for IntervalTickSource {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl TickSource for IntervalTickSource {
    fn start(&self, cancel: CancellationToken) -> mpsc::Receiver<()> {
        let (tx, rx) = mpsc::channel(1);
        let period = self.period;

        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if tx.send(()).await.is_err() {
                            break;
                        }
                    }
                    _ = cancel.cancelled() => break,
                }
            }
        });

        rx
    }
}

/// A running tick subscription. Cancelling it stops tick delivery; dropping it
/// does the same.
pub struct TickerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    pub fn new(cancel: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Still delivering: not cancelled and the task has not exited.
    pub fn is_live(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn cancel(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
