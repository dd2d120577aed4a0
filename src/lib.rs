//! REVIEW FEED SCRAPER
//! Drives a browser over a review feed, scrolling until the feed runs dry,
//! and streams every distinct review into `<entity>.csv`.

pub mod browser;
pub mod config;
pub mod dedup;
mod error;
mod macros;
pub mod output;
pub mod page;
pub mod parse;
pub mod process;
pub mod scroll;
pub mod snapshot;

pub use error::{Error, Result};

/// Only the most recent cards are re-examined on every pass.
pub const LOOKBACK_LIMIT: usize = 150;
/// Pause after scrolling, before the offset is measured.
pub const SCROLL_DWELL_MS: u64 = 3_000;
/// Extra pause on every stalled check.
pub const STALL_DWELL_MS: u64 = 2_000;
/// Wait ceiling for a single field / button lookup.
pub const LOOKUP_TIMEOUT_MS: u64 = 5_000;
/// Wait ceiling applied page wide by the browser session.
pub const PAGE_TIMEOUT_MS: u64 = 30_000;
/// Consecutive no-progress checks that end the crawl.
const STALL_LIMIT: u32 = 2;
pub const OUTPUT_DIR: &str = "output";
const OUTPUT_EXT: &str = "csv";
const HEADER: [&str; 5] = ["name", "post_date", "likes", "ratings", "comment"];
