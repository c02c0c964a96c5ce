//! flock-defer - Schedule a comment and deliver it when due

use clap::Parser;
use libflockpost::accounts::AccountPool;
use libflockpost::error::{FlockError, PlatformError};
use libflockpost::platforms::connector_from_env;
use libflockpost::schedule_time::parse_fire_time;
use libflockpost::submit::parse_target_url;
use libflockpost::{Config, ContentSubmitter, JobScheduler, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "flock-defer")]
#[command(version)]
#[command(about = "Schedule a comment and deliver it when due")]
#[command(long_about = "\
flock-defer - Schedule a comment and deliver it when due

DESCRIPTION:
    flock-defer registers a one-shot comment against a submission URL and
    runs the delivery worker in the foreground until the comment has been
    posted. The worker wakes on a fixed tick (60 seconds by default), so
    delivery happens at the first tick at or after the requested time.

    Jobs live in memory only: if the process exits before the fire time,
    the comment is not delivered.

USAGE:
    # Comment in two minutes
    flock-defer https://example.com/r/rust/comments/t3_abc/title/ \\
        \"Congrats on shipping!\" --at 2m

    # Comment at an absolute time, from the second account
    flock-defer https://example.com/r/rust/comments/t3_abc/title/ \\
        \"Reminder thread\" --at 2026-08-07T09:00:00Z --account 2

SIGNALS:
    SIGTERM, SIGINT - Graceful shutdown; a job mid-delivery finishes first

EXIT CODES:
    0 - Comment delivered, or clean shutdown before the fire time
    1 - Runtime error
    2 - No account loaded, or configuration error
    3 - Invalid input (bad fire time, bad target URL, empty text)
")]
struct Cli {
    /// Submission URL to comment on
    target_url: String,

    /// Comment text
    text: String,

    /// When to fire: RFC 3339, a duration like "2m", or natural language
    #[arg(long, value_name = "TIME")]
    at: String,

    /// Account ordinal to comment from
    #[arg(short, long, default_value = "1", value_name = "ORDINAL")]
    account: usize,

    /// Worker tick in seconds (overrides config)
    #[arg(long, value_name = "SECONDS")]
    tick: Option<u64>,

    /// Fire due jobs once and exit (for testing)
    #[arg(long, hide = true)]
    once: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    libflockpost::logging::init_with(&config.logging, cli.verbose);

    let fire_at = parse_fire_time(&cli.at)?;
    // Reject a bad URL now rather than at fire time.
    parse_target_url(&cli.target_url)?;

    let connector = connector_from_env()?;
    let pool = AccountPool::with_max_slots(connector, config.accounts.max_slots);
    let load = pool.load().await;
    if !load.success() {
        return Err(FlockError::Platform(PlatformError::Authentication(
            "no account loaded".to_string(),
        )));
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let tick = cli.tick.unwrap_or(config.scheduler.tick_seconds);
    let submitter = ContentSubmitter::new(pool);
    let scheduler = JobScheduler::with_tick(submitter, tick);

    let job_id = scheduler.schedule(cli.account, &cli.target_url, &cli.text, fire_at)?;
    info!(%job_id, fire_at = %fire_at, tick_seconds = tick, "job registered");

    if cli.once {
        scheduler.run_once().await;
        scheduler.shutdown();
        return Ok(());
    }

    loop {
        if shutdown.load(Ordering::Relaxed) {
            info!("shutdown requested before fire time");
            scheduler.shutdown();
            break;
        }
        if scheduler.list_pending().is_empty() {
            info!(%job_id, "job delivered, exiting");
            scheduler.shutdown();
            break;
        }
        sleep(Duration::from_secs(1)).await;
    }

    Ok(())
}

#[cfg(unix)]
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| FlockError::InvalidInput(format!("Signal setup failed: {}", e)))?;

    std::thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGTERM | SIGINT => {
                    info!("Received shutdown signal, stopping gracefully...");
                    shutdown.store(true, Ordering::Relaxed);
                    break;
                }
                _ => {}
            }
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn setup_signal_handlers(_shutdown: Arc<AtomicBool>) -> Result<()> {
    Ok(())
}
