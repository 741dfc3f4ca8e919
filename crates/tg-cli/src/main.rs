use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tg_cli::commands::{layout, now, slots};
use tg_cli::{Cli, Commands, Config};
use tg_core::{Clock, EnrichmentMode, FixedClock, SystemClock, parse_instant};

/// Uses `at` when given, otherwise the system clock.
fn clock_for(at: Option<&str>) -> Result<Arc<dyn Clock>> {
    match at {
        Some(value) => {
            let instant = parse_instant(value).context("invalid instant")?;
            Ok(Arc::new(FixedClock(instant)))
        }
        None => Ok(Arc::new(SystemClock)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    config
        .layout
        .validate()
        .context("invalid layout configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Some(Commands::Layout {
            events,
            start,
            days,
            by_date,
            sorted,
            now,
            json,
        }) => {
            let mut layout_config = config.layout;
            if by_date {
                layout_config.mode = EnrichmentMode::ByDate;
            }
            if sorted {
                layout_config.events_are_sorted = true;
            }

            let events = layout::load_events(&events)?;
            let now = clock_for(now.as_deref())?.now();
            let dates = layout::date_range(start.unwrap_or_else(|| now.date()), days);
            layout::run(&mut stdout, layout_config, &events, &dates, Some(now), json)?;
        }
        Some(Commands::Slots { step, ampm }) => {
            slots::run(
                &mut stdout,
                step.unwrap_or(config.layout.minute_step),
                ampm || config.ampm,
            )?;
        }
        Some(Commands::Now {
            at,
            ticks,
            interval_ms,
        }) => {
            let clock = clock_for(at.as_deref())?;
            now::run(
                &mut stdout,
                clock,
                ticks,
                Duration::from_millis(interval_ms),
            )?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
