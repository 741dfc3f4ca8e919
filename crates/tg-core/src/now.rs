//! The "now" indicator.
//!
//! The percentage itself is a pure function of the current instant. Keeping
//! it fresh is a matter of lifecycle: a [`NowTicker`] exists only while the
//! indicator is visible, and dropping it stops the timer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::position::relative_top_in_day;
use crate::types::LayoutError;

/// How often the indicator is refreshed by default.
pub const DEFAULT_TICK: Duration = Duration::from_secs(60);

/// Source of the current wall-clock instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Vertical position of the now line, as a percentage of the day column.
pub fn now_indicator_percent(now: NaiveDateTime) -> f64 {
    relative_top_in_day(now)
}

/// Returns true if `date` is the calendar date of `now`.
pub fn is_today(date: NaiveDate, now: NaiveDateTime) -> bool {
    date == now.date()
}

/// Periodically recomputes the now indicator while it is shown.
///
/// Must be started from within a tokio runtime. The background task is
/// aborted by [`NowTicker::stop`] or when the ticker is dropped.
#[derive(Debug)]
pub struct NowTicker {
    handle: JoinHandle<()>,
    percent: watch::Receiver<f64>,
}

impl NowTicker {
    /// Starts ticking every `period`, publishing the current percentage.
    ///
    /// A zero `period` is rejected before any task is spawned.
    pub fn start(clock: Arc<dyn Clock>, period: Duration) -> Result<Self, LayoutError> {
        if period.is_zero() {
            return Err(LayoutError::ZeroTickPeriod);
        }

        let (tx, rx) = watch::channel(now_indicator_percent(clock.now()));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick is immediate and the initial value is already published.
            interval.tick().await;

            loop {
                interval.tick().await;
                let percent = now_indicator_percent(clock.now());
                tracing::trace!(percent, "now indicator tick");
                tx.send_replace(percent);
            }
        });

        Ok(Self {
            handle,
            percent: rx,
        })
    }

    /// The most recently published percentage.
    pub fn current(&self) -> f64 {
        *self.percent.borrow()
    }

    /// A receiver notified on every tick.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.percent.clone()
    }

    /// Returns true while the background task is alive.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops the timer. Subscribers see the channel close.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for NowTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
