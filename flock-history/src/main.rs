//! flock-history - Read back what an account has posted

use clap::Parser;
use libflockpost::accounts::AccountPool;
use libflockpost::error::{FlockError, PlatformError};
use libflockpost::platforms::connector_from_env;
use libflockpost::{Config, DestinationInspector, Result};

#[derive(Parser, Debug)]
#[command(name = "flock-history")]
#[command(version)]
#[command(about = "Read back what an account has posted")]
#[command(long_about = "\
flock-history - Read back what an account has posted

DESCRIPTION:
    Without --comments, lists the account's own most recent submissions,
    newest first. With --comments, lists the top-level comments of the
    submission the given URL points at.

USAGE:
    # Last ten submissions from the first account
    flock-history

    # More of them, from the second account
    flock-history --account 2 --limit 25

    # Comments under a submission
    flock-history --comments https://example.com/r/rust/comments/t3_abc/title/

EXIT CODES:
    0 - Listed
    1 - Remote failure
    2 - No account loaded, or configuration error
    3 - Invalid input (bad target URL)
")]
struct Cli {
    /// Account ordinal to read from
    #[arg(short, long, default_value = "1", value_name = "ORDINAL")]
    account: usize,

    /// Maximum number of entries to list
    #[arg(short, long, default_value = "10", value_name = "COUNT")]
    limit: usize,

    /// List the comments of this submission instead of own posts
    #[arg(long, value_name = "URL")]
    comments: Option<String>,

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
    let load = pool.load().await;
    if !load.success() {
        return Err(FlockError::Platform(PlatformError::Authentication(
            "no account loaded".to_string(),
        )));
    }

    let inspector = DestinationInspector::new(pool);

    match &cli.comments {
        Some(target_url) => {
            tracing::debug!(target_url, account = cli.account, "reading back comments");
            let comments = inspector
                .comments(cli.account, target_url, cli.limit)
                .await?;
            match cli.format.as_str() {
                "json" => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&comments).unwrap_or_default()
                    );
                }
                _ => {
                    for comment in &comments {
                        println!("{}  {}  {}", comment.id, comment.author, comment.body);
                    }
                }
            }
        }
        None => {
            tracing::debug!(account = cli.account, limit = cli.limit, "reading back submissions");
            let posts = inspector.submissions(cli.account, cli.limit).await?;
            match cli.format.as_str() {
                "json" => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&posts).unwrap_or_default()
                    );
                }
                _ => {
                    for post in &posts {
                        println!("{}  {}", post.id, post.title);
                        println!("    {}", post.permalink);
                    }
                }
            }
        }
    }

    Ok(())
}
