//! flock-verify - Check a destination before posting into it

use clap::Parser;
use libflockpost::accounts::AccountPool;
use libflockpost::error::{FlockError, PlatformError};
use libflockpost::platforms::connector_from_env;
use libflockpost::types::DestinationStatus;
use libflockpost::{Config, DestinationInspector, Result};

#[derive(Parser, Debug)]
#[command(name = "flock-verify")]
#[command(version)]
#[command(about = "Check a destination before posting into it")]
#[command(long_about = "\
flock-verify - Check a destination before posting into it

DESCRIPTION:
    Probes a destination through one of the loaded accounts and reports
    whether it exists and is accessible. Optionally lists the flair
    templates it offers, so a flair id can be chosen for flock-post.

USAGE:
    # Probe with the first account
    flock-verify rust

    # Probe with a specific account and list flairs
    flock-verify rust --account 2 --flairs

    # Machine-readable output
    flock-verify rust --format json

EXIT CODES:
    0 - Destination accessible
    1 - Destination missing, restricted, or unreachable
    2 - No account loaded, or configuration error
    3 - Invalid input
")]
struct Cli {
    /// Destination to probe
    destination: String,

    /// Account ordinal to probe with
    #[arg(short, long, default_value = "1", value_name = "ORDINAL")]
    account: usize,

    /// Also list the destination's flair templates
    #[arg(long)]
    flairs: bool,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

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

    if cli.destination.is_empty() {
        return Err(FlockError::InvalidInput(
            "Destination cannot be empty".to_string(),
        ));
    }

    let connector = connector_from_env()?;
    let pool = AccountPool::with_max_slots(connector, config.accounts.max_slots);
    let load = pool.load().await;
    if !load.success() {
        return Err(FlockError::Platform(PlatformError::Authentication(
            "no account loaded".to_string(),
        )));
    }

    let inspector = DestinationInspector::new(pool);
    tracing::debug!(destination = %cli.destination, account = cli.account, "probing");
    let status = inspector.verify(cli.account, &cli.destination).await?;

    let flairs = if cli.flairs && matches!(status, DestinationStatus::Accessible { .. }) {
        inspector.flairs(cli.account, &cli.destination).await?
    } else {
        Vec::new()
    };

    match cli.format.as_str() {
        "json" => {
            let report = serde_json::json!({
                "destination": cli.destination,
                "result": status,
                "flairs": flairs,
            });
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        }
        _ => {
            match &status {
                DestinationStatus::Accessible {
                    display_name,
                    title,
                } => {
                    println!("✓ {} — {}", display_name, title);
                }
                DestinationStatus::NotFound => {
                    println!("✗ {}: not found", cli.destination);
                }
                DestinationStatus::Restricted => {
                    println!("✗ {}: restricted", cli.destination);
                }
                DestinationStatus::Inaccessible { reason } => {
                    println!("✗ {}: {}", cli.destination, reason);
                }
            }
            for flair in &flairs {
                println!("  flair {}  {}", flair.id, flair.text);
            }
        }
    }

    if !matches!(status, DestinationStatus::Accessible { .. }) {
        std::process::exit(1);
    }

    Ok(())
}
