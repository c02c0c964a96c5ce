//! flock-post - Publish a post through one of the loaded accounts

use clap::Parser;
use libflockpost::accounts::AccountPool;
use libflockpost::error::{FlockError, PlatformError};
use libflockpost::platforms::connector_from_env;
use libflockpost::types::ContentRequest;
use libflockpost::{Config, ContentSubmitter, Result};

#[derive(Parser, Debug)]
#[command(name = "flock-post")]
#[command(version)]
#[command(about = "Publish a post through one of the loaded accounts")]
#[command(long_about = "\
flock-post - Publish a post through one of the loaded accounts

DESCRIPTION:
    Submits a text, link, or image post to a destination. At most one of
    --body, --url, and --image may be given; with none of them the post
    is a text post with an empty body.

USAGE:
    # Text post
    flock-post rust \"Release notes\" --body \"We shipped.\"

    # Link post from the second account, with flair
    flock-post rust \"Good read\" --url https://example.com --account 2 --flair-id f1

    # Image post, marked as a spoiler
    flock-post pics \"Sunset\" --image ./sunset.png --spoiler

EXIT CODES:
    0 - Published
    1 - Remote failure (forbidden, not found, transport, ...)
    2 - No account loaded, or configuration error
    3 - Invalid input (missing field, ambiguous content kind, missing file)
")]
struct Cli {
    /// Destination to post into
    destination: String,

    /// Post title
    title: String,

    /// Self-post body text
    #[arg(short, long, value_name = "TEXT")]
    body: Option<String>,

    /// Link to submit
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Path to a local image file
    #[arg(short, long, value_name = "PATH")]
    image: Option<String>,

    /// Account ordinal to post from
    #[arg(short, long, default_value = "1", value_name = "ORDINAL")]
    account: usize,

    /// Flair template id to apply
    #[arg(long, value_name = "ID")]
    flair_id: Option<String>,

    /// Free-text flair to apply
    #[arg(long, value_name = "TEXT")]
    flair_text: Option<String>,

    /// Mark the post NSFW
    #[arg(long)]
    nsfw: bool,

    /// Mark the post as a spoiler
    #[arg(long)]
    spoiler: bool,

    /// Receive reply notifications for this post
    #[arg(long)]
    notify: bool,

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

    let mut request = ContentRequest::new(cli.account, &cli.destination, &cli.title);
    request.body = cli.body;
    request.url = cli.url;
    request.image_path = cli.image;
    request.flair_id = cli.flair_id;
    request.flair_text = cli.flair_text;
    request.nsfw = cli.nsfw;
    request.spoiler = cli.spoiler;
    request.notify_on_reply = cli.notify;

    let submitter = ContentSubmitter::new(pool);
    tracing::debug!(
        destination = %request.destination,
        kinds = request.populated_kinds(),
        "submitting"
    );
    let published = submitter.submit(&request).await?;

    match cli.format.as_str() {
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&published).unwrap_or_default()
            );
        }
        _ => {
            println!("{} ({})", published.id, published.kind);
            println!("{}", published.permalink);
        }
    }

    Ok(())
}
