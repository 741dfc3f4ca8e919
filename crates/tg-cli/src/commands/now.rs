//! Now command for reporting the now indicator.
//!
//! With `--ticks`, a [`NowTicker`] keeps the value fresh and every refresh
//! is printed until the requested count is reached.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tg_core::{Clock, NowTicker, now_indicator_percent};

fn format_now(instant: NaiveDateTime, percent: f64) -> String {
    format!("{}  {percent:.2}%", instant.format("%Y-%m-%d %H:%M"))
}

/// Prints the current position, then one line per refresh.
pub async fn watch<W: Write>(
    writer: &mut W,
    clock: Arc<dyn Clock>,
    ticks: u32,
    period: Duration,
) -> Result<()> {
    let ticker =
        NowTicker::start(Arc::clone(&clock), period).context("failed to start now ticker")?;
    let mut updates = ticker.subscribe();

    let percent = *updates.borrow_and_update();
    writeln!(writer, "{}", format_now(clock.now(), percent))?;

    for tick in 1..=ticks {
        updates.changed().await.context("now ticker stopped")?;
        let percent = *updates.borrow_and_update();
        tracing::debug!(tick, percent, "now indicator refreshed");
        writeln!(writer, "{}", format_now(clock.now(), percent))?;
    }

    ticker.stop();
    Ok(())
}

/// Runs the now command.
pub fn run<W: Write>(
    writer: &mut W,
    clock: Arc<dyn Clock>,
    ticks: u32,
    period: Duration,
) -> Result<()> {
    if ticks == 0 {
        let now = clock.now();
        writeln!(writer, "{}", format_now(now, now_indicator_percent(now)))?;
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(watch(writer, clock, ticks, period))
}
