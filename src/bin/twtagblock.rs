use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tag_blocker::{
    cli, settings, twitter::Client, BlockFailurePolicy, DriveLoop, Failure, SearchQuery, Settings,
};

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("Unexpected error occurred ({0})")]
    Setup(#[from] tag_blocker::Error),
    #[error(transparent)]
    Run(#[from] Failure),
}

/// Block the authors of every recent status carrying a hashtag.
///
/// Exits with status 0 when the search is exhausted, the search limit is reached, or the run is
/// interrupted, and with status 1 after printing the error message when the run fails.
#[tokio::main]
async fn main() {
    let opts: Opts = Opts::parse();
    let _ = cli::init_logging(opts.verbose);

    if let Err(error) = run(opts).await {
        println!("{}", error);
        std::process::exit(1);
    }
}

async fn run(opts: Opts) -> Result<(), Error> {
    let query = SearchQuery::new(&opts.keyword, !opts.include_retweets)?;
    let client = Client::from_config_file(&opts.key_file)?;
    let settings = Settings {
        page_size: opts.count,
        search_limit: opts.search_limit,
        retries: opts.retries,
        retry_backoff: Duration::from_millis(opts.retry_backoff_ms),
        block_failures: if opts.keep_going {
            BlockFailurePolicy::Skip
        } else {
            BlockFailurePolicy::Abort
        },
    };

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted; stopping before the next search");
            flag.store(true, Ordering::SeqCst);
        }
    });

    let drive = DriveLoop::new(&client, &client, settings)?.with_cancellation(cancelled);
    let summary = drive
        .run(&query, |outcome| {
            if outcome.succeeded {
                println!("Blocked @{}", outcome.screen_name);
            } else {
                println!("Failed to block @{}", outcome.screen_name);
            }
        })
        .await?;

    println!("{}.", summary.stop);
    println!(
        "Blocked {} accounts ({} failed) in {} searches",
        summary.blocked, summary.failed, summary.fetches
    );

    Ok(())
}

#[derive(Parser)]
#[clap(name = "twtagblock", version, author)]
struct Opts {
    /// TOML file containing Twitter API keys
    #[clap(short, long, default_value = "keys.toml")]
    key_file: String,
    /// Number of statuses to request per search (at most 100)
    #[clap(short, long, default_value_t = settings::MAX_PAGE_SIZE)]
    count: u8,
    /// Maximum number of searches after the first
    #[clap(short = 'l', long, default_value_t = settings::DEFAULT_SEARCH_LIMIT)]
    search_limit: usize,
    /// Retries for requests that fail before reaching the API
    #[clap(short, long, default_value_t = 0)]
    retries: u32,
    /// Initial delay between retries in milliseconds
    #[clap(long, default_value_t = 250)]
    retry_backoff_ms: u64,
    /// Also block the authors of retweets
    #[clap(long)]
    include_retweets: bool,
    /// Continue with the remaining accounts when the API refuses to block one
    #[clap(long)]
    keep_going: bool,
    /// Level of verbosity
    #[clap(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Hashtag to search for, without the leading #
    keyword: String,
}
