use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use review_scrap::browser::ChromePage;
use review_scrap::config::{BrowserConfig, CrawlConfig};
use review_scrap::dedup::IdentityScheme;
use review_scrap::process::crawl;
use review_scrap::snapshot::SnapshotPage;
use review_scrap::{
    info_time, Result, LOOKBACK_LIMIT, LOOKUP_TIMEOUT_MS, OUTPUT_DIR, PAGE_TIMEOUT_MS,
    SCROLL_DWELL_MS, STALL_DWELL_MS,
};

#[derive(Parser)]
#[command(name = "review_scrap", about = "Scrape every review of an app into a CSV file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a live review feed in Chrome
    Crawl {
        /// Review page of the app
        url: String,
        /// Run Chrome without a window (the feed may refuse to load)
        #[arg(long, env = "REVIEW_SCRAP_HEADLESS")]
        headless: bool,
        /// Chrome binary to launch instead of the detected one
        #[arg(long, env = "REVIEW_SCRAP_CHROME")]
        chrome: Option<PathBuf>,
        /// Wait ceiling for page lookups and the app name, in milliseconds
        #[arg(long, env = "REVIEW_SCRAP_PAGE_TIMEOUT_MS", default_value_t = PAGE_TIMEOUT_MS)]
        page_timeout_ms: u64,
        #[command(flatten)]
        crawl: CrawlArgs,
    },
    /// Replay a feed saved as HTML files, one file per scroll, sorted by name
    Replay {
        dir: PathBuf,
        #[command(flatten)]
        crawl: CrawlArgs,
    },
}

#[derive(Args)]
struct CrawlArgs {
    /// Directory the CSV is written to
    #[arg(short, long, env = "REVIEW_SCRAP_OUTPUT", default_value = OUTPUT_DIR)]
    output: PathBuf,
    /// Most recent cards examined on every pass
    #[arg(short = 'n', long, env = "REVIEW_SCRAP_LOOKBACK", default_value_t = LOOKBACK_LIMIT)]
    lookback: usize,
    /// Pause after scrolling before measuring, in milliseconds
    #[arg(long, env = "REVIEW_SCRAP_DWELL_MS", default_value_t = SCROLL_DWELL_MS)]
    dwell_ms: u64,
    /// Extra pause on a stalled scroll, in milliseconds
    #[arg(long, env = "REVIEW_SCRAP_STALL_DWELL_MS", default_value_t = STALL_DWELL_MS)]
    stall_dwell_ms: u64,
    /// Wait ceiling of a single field lookup, in milliseconds
    #[arg(long, env = "REVIEW_SCRAP_LOOKUP_TIMEOUT_MS", default_value_t = LOOKUP_TIMEOUT_MS)]
    lookup_timeout_ms: u64,
    /// How reviews are told apart
    #[arg(long, value_enum, env = "REVIEW_SCRAP_IDENTITY", default_value_t = Identity::Concat)]
    identity: Identity,
}

#[derive(Clone, Copy, ValueEnum)]
enum Identity {
    /// All fields glued together
    Concat,
    /// Length-prefixed fields, no boundary collisions
    LengthPrefixed,
}

impl From<CrawlArgs> for CrawlConfig {
    fn from(args: CrawlArgs) -> Self {
        CrawlConfig {
            lookback: args.lookback,
            scroll_dwell: Duration::from_millis(args.dwell_ms),
            stall_dwell: Duration::from_millis(args.stall_dwell_ms),
            lookup_timeout: Duration::from_millis(args.lookup_timeout_ms),
            output_dir: args.output,
            identity: match args.identity {
                Identity::Concat => IdentityScheme::Concat,
                Identity::LengthPrefixed => IdentityScheme::LengthPrefixed,
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let start_time = Local::now();
    let cli = Cli::parse();

    // The browser is driven with blocking calls, keep them off the runtime.
    let report = match cli.command {
        Commands::Crawl {
            url,
            headless,
            chrome,
            page_timeout_ms,
            crawl: args,
        } => {
            let browser = BrowserConfig {
                headless,
                chrome_path: chrome,
                page_timeout: Duration::from_millis(page_timeout_ms),
                ..Default::default()
            };
            let config = CrawlConfig {
                name_timeout: browser.page_timeout,
                ..CrawlConfig::from(args)
            };
            tokio::task::spawn_blocking(move || {
                let page = ChromePage::launch(&browser)?;
                crawl(&page, &url, &config)
            })
            .await??
        }
        Commands::Replay { dir, crawl: args } => {
            let config = CrawlConfig::from(args);
            tokio::task::spawn_blocking(move || {
                let page = SnapshotPage::from_dir(&dir)?;
                crawl(&page, &dir.display().to_string(), &config)
            })
            .await??
        }
    };

    info_time!(
        start_time,
        "Full program time: {} written, {} duplicates, {} empty cards, {} passes",
        report.written,
        report.duplicates,
        report.empty,
        report.passes
    );
    println!("{}", report.path.display());

    Ok(())
}
