//! Stoppable periodic spread timer.

use crate::driver::FieldEvent;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// `tokio::time::interval` rejects a zero period
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Sends [`FieldEvent::Tick`] once per period until stopped or dropped.
///
/// The first tick fires one full period after start. Stopping never waits
/// for the event loop: a tick already queued is simply handled as usual.
pub struct SpreadTimer {
    cancel: CancellationToken,
    period: Duration,
}

impl SpreadTimer {
    pub fn start(period: Duration, events: mpsc::Sender<FieldEvent>) -> Self {
        let period = period.max(MIN_PERIOD);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match events.try_send(FieldEvent::Tick) {
                            Ok(()) => {}
                            Err(TrySendError::Full(_)) => {
                                trace!("Event queue full, skipping tick");
                            }
                            Err(TrySendError::Closed(_)) => break,
                        }
                    }
                }
            }

            debug!("Spread timer stopped");
        });

        debug!(period_ms = period.as_millis() as u64, "Spread timer started");
        Self { cancel, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SpreadTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn drain(rx: &mut mpsc::Receiver<FieldEvent>) -> usize {
        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event, FieldEvent::Tick);
            count += 1;
        }
        count
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let (tx, mut rx) = mpsc::channel(16);
        let timer = SpreadTimer::start(Duration::from_millis(100), tx);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(drain(&mut rx), 0);

        sleep(Duration::from_millis(300)).await;
        assert_eq!(drain(&mut rx), 3);

        timer.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_the_schedule() {
        let (tx, mut rx) = mpsc::channel(16);
        let timer = SpreadTimer::start(Duration::from_millis(100), tx);

        sleep(Duration::from_millis(150)).await;
        timer.stop();
        assert_eq!(drain(&mut rx), 1);

        // The task exits and drops its sender, closing the channel
        sleep(Duration::from_millis(500)).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_timer() {
        let (tx, mut rx) = mpsc::channel(16);
        drop(SpreadTimer::start(Duration::from_millis(100), tx));

        sleep(Duration::from_millis(500)).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_is_clamped() {
        let (tx, _rx) = mpsc::channel(16);
        let timer = SpreadTimer::start(Duration::ZERO, tx);
        assert_eq!(timer.period(), MIN_PERIOD);
    }
}
