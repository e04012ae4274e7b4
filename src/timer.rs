use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::clock::MatchClock;
use crate::model::Half;

/// Drives a [`MatchClock`] from a background ticker task.
///
/// At most one ticker exists at a time. It is spawned by [`MatchTimer::start`]
/// and aborted by [`MatchTimer::pause`] or when the timer is dropped.
#[derive(Debug)]
pub struct MatchTimer {
    clock: Arc<Mutex<MatchClock>>,
    ticker: Option<JoinHandle<()>>,
    period: Duration,
}

impl MatchTimer {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            clock: Arc::new(Mutex::new(MatchClock::new())),
            ticker: None,
            period,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MatchClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the clock as it reads right now.
    pub fn snapshot(&self) -> MatchClock {
        self.lock().clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start the clock. Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        self.lock().start();

        let clock = Arc::clone(&self.clock);
        let period = self.period;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut clock = clock.lock().unwrap_or_else(PoisonError::into_inner);
                clock.tick();
                trace!(elapsed = clock.elapsed(), half = %clock.half(), "clock tick");
            }
        }));
        debug!("match clock started");
    }

    pub fn pause(&mut self) {
        self.lock().pause();
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            debug!(elapsed = self.lock().elapsed(), "match clock paused");
        }
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn set_half(&self, half: Half) {
        self.lock().set_half(half);
    }
}

impl Default for MatchTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MatchTimer {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}
