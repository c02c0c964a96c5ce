//! flock-accounts - Load the account pool and report what came up

use clap::Parser;
use libflockpost::accounts::AccountPool;
use libflockpost::error::{FlockError, PlatformError};
use libflockpost::platforms::connector_from_env;
use libflockpost::{Config, Result};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "flock-accounts")]
#[command(version)]
#[command(about = "Load the account pool and report what came up")]
#[command(long_about = "\
flock-accounts - Load the account pool and report what came up

DESCRIPTION:
    Discovers credential slots from the environment, authenticates each
    one, and prints the resulting ordinal assignments. Accounts that fail
    to authenticate are listed with the reason; they do not abort the
    rest of the pool.

USAGE:
    # Human-readable listing
    flock-accounts

    # Machine-readable listing
    flock-accounts --format json

CONFIGURATION:
    Credential slots (all five variables required per slot):
        FLOCKPOST_ACCOUNT_1_CLIENT_ID
        FLOCKPOST_ACCOUNT_1_CLIENT_SECRET
        FLOCKPOST_ACCOUNT_1_USERNAME
        FLOCKPOST_ACCOUNT_1_PASSWORD
        FLOCKPOST_ACCOUNT_1_USER_AGENT
    Slots are scanned 1..=30; the unindexed FLOCKPOST_* form is a
    fallback when no indexed slot is complete.

EXIT CODES:
    0 - At least one account loaded
    2 - No account loaded, or configuration error
")]
struct Cli {
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

    let connector = connector_from_env()?;
    let pool = AccountPool::with_max_slots(connector, config.accounts.max_slots);

    debug!(max_slots = config.accounts.max_slots, "loading account pool");
    let result = pool.load().await;

    match cli.format.as_str() {
        "json" => {
            let accounts: Vec<_> = pool
                .usernames()
                .into_iter()
                .map(|(ordinal, username)| {
                    serde_json::json!({ "ordinal": ordinal, "username": username })
                })
                .collect();
            let failures: Vec<_> = result
                .failures
                .iter()
                .map(|failure| {
                    serde_json::json!({
                        "username": failure.username,
                        "message": failure.message,
                    })
                })
                .collect();
            let report = serde_json::json!({
                "loaded": result.total_loaded,
                "accounts": accounts,
                "failures": failures,
            });
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        }
        _ => {
            for (ordinal, username) in pool.usernames() {
                println!("{:>3}  {}", ordinal, username);
            }
            for failure in &result.failures {
                println!("  ✗  {}: {}", failure.username, failure.message);
            }
        }
    }

    if !result.success() {
        return Err(FlockError::Platform(PlatformError::Authentication(
            format!(
                "no account loaded ({} candidate(s) failed)",
                result.failures.len()
            ),
        )));
    }

    Ok(())
}
