//! Sync subcommands: drive the poll loop against the configured feed.

use chrono::Utc;
use clap::Subcommand;
use hytta_core::sync::{CalendarFeedClient, PollContext, SyncEngine};
use hytta_core::{Config, Event, SystemClock};
use std::sync::mpsc;

/// Sync actions for the calendar feed.
#[derive(Subcommand)]
pub enum SyncAction {
    /// Poll the feed and print fetched events
    Run {
        /// Keep polling on the adaptive cadence until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Poll once and print sync health
    Status,
}

/// Run the sync command.
pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SyncAction::Run { watch } => run_sync(watch),
        SyncAction::Status => show_status(),
    }
}

fn run_sync(watch: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = CalendarFeedClient::new(&config.sync.feed_url)?;
    let (tx, rx) = mpsc::channel();
    let mut engine =
        SyncEngine::new(SystemClock, client, config.retry_policy()).with_event_channel(tx);

    loop {
        let context = build_context(&config, engine.latest_events());
        engine.tick(&context);
        for event in rx.try_iter() {
            println!("{}", describe_event(&event));
        }

        if !watch {
            break;
        }

        // Sleep until the next deadline, capped so context changes
        // (night window, nearing events) are picked up reasonably soon.
        let now = Utc::now();
        let sleep_secs = engine
            .next_due_at()
            .map(|at| (at - now).num_seconds().clamp(1, 60))
            .unwrap_or(60);
        log::debug!("sleeping {sleep_secs}s until next tick");
        std::thread::sleep(std::time::Duration::from_secs(sleep_secs as u64));
    }

    for event in engine.latest_events() {
        println!(
            "  {}  {} .. {}  {}",
            event.id,
            event.start.format("%Y-%m-%d %H:%M"),
            event.end.format("%Y-%m-%d %H:%M"),
            event.title,
        );
    }
    print_status(&engine.status());
    engine.shutdown();
    Ok(())
}

fn show_status() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = CalendarFeedClient::new(&config.sync.feed_url)?;
    let mut engine = SyncEngine::new(SystemClock, client, config.retry_policy());

    let context = build_context(&config, &[]);
    let status = engine.tick(&context);
    print_status(&status);
    engine.shutdown();
    Ok(())
}

/// Fresh context for one scheduling decision. The CLI process itself is
/// only running while online, so connectivity is reported as up.
fn build_context(config: &Config, latest: &[hytta_core::UpcomingEvent]) -> PollContext {
    let now = Utc::now();
    PollContext {
        upcoming_event_starts: latest.iter().map(|e| e.start).collect(),
        night_mode: config.night.is_night(now),
        connected: true,
    }
}

fn print_status(status: &hytta_core::SyncStatus) {
    match status.last_sync_at {
        Some(at) => println!("Last sync: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Last sync: never"),
    }
    println!("Consecutive failures: {}", status.consecutive_failures);
    if status.retrying {
        println!("Health: retrying");
    } else if status.needs_attention {
        println!("Health: needs attention (retries exhausted)");
    } else {
        println!("Health: ok");
    }
}

fn describe_event(event: &Event) -> String {
    match event {
        Event::PollStarted { at } => format!("[{}] poll started", at.format("%H:%M:%S")),
        Event::PollSucceeded { events_fetched, at } => {
            format!("[{}] fetched {events_fetched} event(s)", at.format("%H:%M:%S"))
        }
        Event::PollFailed {
            consecutive_failures,
            error,
            at,
        } => format!(
            "[{}] poll failed ({consecutive_failures} consecutive): {error}",
            at.format("%H:%M:%S")
        ),
        Event::RetryScheduled {
            attempt,
            delay_secs,
            at,
        } => format!(
            "[{}] retry {attempt} in {delay_secs}s",
            at.format("%H:%M:%S")
        ),
        Event::RetriesExhausted {
            consecutive_failures,
            at,
        } => format!(
            "[{}] giving up after {consecutive_failures} failures; manual action needed",
            at.format("%H:%M:%S")
        ),
        Event::ConnectivityRegained { at } => {
            format!("[{}] connectivity regained, polling now", at.format("%H:%M:%S"))
        }
    }
}
