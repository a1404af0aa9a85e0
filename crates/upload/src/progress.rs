use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Value published as soon as an upload starts.
pub const START: u8 = 10;

/// Highest value an estimate may reach; only a confirmed transfer goes past it.
pub const MAX_ESTIMATE: u8 = 99;

/// Value published once the transfer is confirmed.
pub const COMPLETE: u8 = 100;

/// Slot request: 10 → 40 over a nominal 2 s. 40 is the phase boundary.
pub const PHASE_SLOT: PhaseSpan = PhaseSpan {
    from: START,
    to: 40,
    nominal: Duration::from_secs(2),
};

/// Byte transfer: 40 → 99 over a nominal 3 s.
pub const PHASE_TRANSFER: PhaseSpan = PhaseSpan {
    from: 40,
    to: MAX_ESTIMATE,
    nominal: Duration::from_secs(3),
};

/// Default estimator tick.
const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Upload progress in percent, published on a watch channel.
///
/// Values only ever increase. Estimates are clamped to [`MAX_ESTIMATE`];
/// [`COMPLETE`] is reserved for the orchestrator after a confirmed
/// transfer.
#[derive(Debug, Clone)]
pub struct Progress {
    tx: Arc<watch::Sender<u8>>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.tx.subscribe()
    }

    pub fn get(&self) -> u8 {
        *self.tx.borrow()
    }

    /// Raises progress to `value` (clamped to [`MAX_ESTIMATE`]).
    ///
    /// Returns `false` and publishes nothing when `value` is not above the
    /// current value.
    pub fn advance(&self, value: u8) -> bool {
        self.raise(value.min(MAX_ESTIMATE))
    }

    pub(crate) fn complete(&self) {
        self.raise(COMPLETE);
    }

    fn raise(&self, value: u8) -> bool {
        self.tx.send_if_modified(|current| {
            if value > *current {
                *current = value;
                true
            } else {
                false
            }
        })
    }
}

/// A range the estimate crosses during one phase of the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSpan {
    pub from: u8,
    pub to: u8,
    /// How long the phase is assumed to take.
    pub nominal: Duration,
}

impl PhaseSpan {
    /// Estimated value after `elapsed`, linear from `from` to `to` and
    /// held at `to` once the nominal duration has passed.
    pub fn at(&self, elapsed: Duration) -> u8 {
        if self.nominal.is_zero() || elapsed >= self.nominal {
            return self.to;
        }
        let fraction = elapsed.as_secs_f64() / self.nominal.as_secs_f64();
        let span = f64::from(self.to.saturating_sub(self.from));
        let value = f64::from(self.from) + fraction * span;
        (value.round() as u8).min(self.to)
    }
}

/// Source of progress estimates for one phase at a time.
pub trait ProgressEstimator: Send + Sync {
    /// Starts moving `progress` across `span`. Updates stop when the
    /// returned ticker is stopped or dropped.
    fn start(&self, progress: &Progress, span: PhaseSpan) -> PhaseTicker;
}

/// Handle to a running estimate.
///
/// [`stop`](Self::stop) waits for the task to exit, so no update lands
/// after it returns. Dropping the ticker aborts the task instead.
#[derive(Debug)]
pub struct PhaseTicker {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PhaseTicker {
    /// A ticker with nothing running behind it.
    pub fn idle() -> Self {
        Self {
            stop: None,
            task: None,
        }
    }

    /// Wraps a spawned task that exits when `stop` fires or is dropped.
    pub fn new(stop: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            stop: Some(stop),
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub async fn stop(mut self) {
        // Dropping the sender signals the task to exit.
        drop(self.stop.take());
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PhaseTicker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Advances progress on wall-clock time against each phase's nominal
/// duration.
#[derive(Debug, Clone)]
pub struct TimedEstimator {
    tick: Duration,
}

impl Default for TimedEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

impl TimedEstimator {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }
}

impl ProgressEstimator for TimedEstimator {
    fn start(&self, progress: &Progress, span: PhaseSpan) -> PhaseTicker {
        let (tx, mut rx) = oneshot::channel::<()>();
        let progress = progress.clone();
        let tick = self.tick;

        let task = tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(tick);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let value = span.at(started.elapsed());
                        progress.advance(value);
                        if value >= span.to {
                            break;
                        }
                    }
                    _ = &mut rx => {
                        break;
                    }
                }
            }
        });

        PhaseTicker::new(tx, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_only_increases() {
        let progress = Progress::new();
        assert!(progress.advance(30));
        assert!(!progress.advance(20));
        assert!(!progress.advance(30));
        assert_eq!(progress.get(), 30);
    }

    #[test]
    fn estimates_never_reach_complete() {
        let progress = Progress::new();
        progress.advance(100);
        assert_eq!(progress.get(), MAX_ESTIMATE);

        progress.complete();
        assert_eq!(progress.get(), COMPLETE);
    }

    #[test]
    fn span_is_linear_and_capped() {
        let span = PHASE_TRANSFER;
        assert_eq!(span.at(Duration::ZERO), 40);
        assert_eq!(span.at(Duration::from_millis(1500)), 70);
        assert_eq!(span.at(Duration::from_secs(3)), 99);
        assert_eq!(span.at(Duration::from_secs(60)), 99);
    }

    #[test]
    fn zero_nominal_jumps_to_end() {
        let span = PhaseSpan {
            from: 10,
            to: 40,
            nominal: Duration::ZERO,
        };
        assert_eq!(span.at(Duration::ZERO), 40);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_estimator_advances_and_holds() {
        let progress = Progress::new();
        progress.advance(START);

        let ticker = TimedEstimator::default().start(&progress, PHASE_SLOT);
        tokio::time::sleep(Duration::from_millis(1050)).await;
        let mid = progress.get();
        assert!(mid > START && mid < PHASE_SLOT.to, "mid = {mid}");

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(progress.get(), PHASE_SLOT.to);
        assert!(!ticker.is_running());
        ticker.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_ticker_publishes_nothing_more() {
        let progress = Progress::new();
        let ticker = TimedEstimator::default().start(&progress, PHASE_TRANSFER);
        tokio::time::sleep(Duration::from_millis(500)).await;

        ticker.stop().await;
        let frozen = progress.get();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(progress.get(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_ticker_is_aborted() {
        let progress = Progress::new();
        let ticker = TimedEstimator::default().start(&progress, PHASE_TRANSFER);
        tokio::time::sleep(Duration::from_millis(300)).await;

        drop(ticker);
        tokio::task::yield_now().await;
        let frozen = progress.get();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(progress.get(), frozen);
    }

    #[test]
    fn idle_ticker_is_not_running() {
        assert!(!PhaseTicker::idle().is_running());
    }
}
