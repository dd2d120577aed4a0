use std::path::PathBuf;
use std::time::Duration;

use crate::dedup::IdentityScheme;
use crate::page::FieldSelector;
use crate::parse::create_selector;
use crate::{
    Error, Result, LOOKBACK_LIMIT, LOOKUP_TIMEOUT_MS, OUTPUT_DIR, PAGE_TIMEOUT_MS,
    SCROLL_DWELL_MS, STALL_DWELL_MS,
};

/// Selectors for the review feed markup (Play Store "all reviews" page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    /// One element per review.
    pub card: String,
    /// The rest are relative to a card.
    pub author: FieldSelector,
    pub post_date: FieldSelector,
    pub likes: FieldSelector,
    pub rating: FieldSelector,
    pub text: FieldSelector,
    /// Page wide.
    pub entity_name: FieldSelector,
    pub load_more: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            card: "div.d15Mdf".into(),
            author: FieldSelector::text("span.X43Kjb"),
            post_date: FieldSelector::text("span.p2TkOb"),
            likes: FieldSelector::text("div.jUL89d"),
            rating: FieldSelector::attribute("div.pf5lIe div[aria-label]", "aria-label"),
            text: FieldSelector::text(r#"span[jsname="bN97Pc"]"#),
            entity_name: FieldSelector::text("h1.AHFaub span"),
            load_more: "span.RveJvd".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Max number of most recent cards examined per pass.
    pub lookback: usize,
    /// Pause between scrolling and measuring the new offset.
    pub scroll_dwell: Duration,
    /// Additional pause whenever the offset didn't move.
    pub stall_dwell: Duration,
    /// Wait ceiling of each field and load-more lookup.
    pub lookup_timeout: Duration,
    /// Wait ceiling of the entity name. Not finding it ends the crawl, so it gets the
    /// page-wide ceiling rather than the per-field one.
    pub name_timeout: Duration,
    pub output_dir: PathBuf,
    pub identity: IdentityScheme,
    pub selectors: Selectors,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            lookback: LOOKBACK_LIMIT,
            scroll_dwell: Duration::from_millis(SCROLL_DWELL_MS),
            stall_dwell: Duration::from_millis(STALL_DWELL_MS),
            lookup_timeout: Duration::from_millis(LOOKUP_TIMEOUT_MS),
            name_timeout: Duration::from_millis(PAGE_TIMEOUT_MS),
            output_dir: PathBuf::from(OUTPUT_DIR),
            identity: IdentityScheme::default(),
            selectors: Selectors::default(),
        }
    }
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lookback == 0 {
            return Err(Error::Config("lookback window must hold at least one card".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::Config("output directory is empty".into()));
        }
        let selectors = &self.selectors;
        let all = [
            selectors.card.as_str(),
            selectors.author.css.as_str(),
            selectors.post_date.css.as_str(),
            selectors.likes.css.as_str(),
            selectors.rating.css.as_str(),
            selectors.text.css.as_str(),
            selectors.entity_name.css.as_str(),
            selectors.load_more.as_str(),
        ];
        for css in all {
            create_selector(css)?;
        }
        Ok(())
    }
}

/// How the browser session is launched.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// The review feed refuses headless sessions, so this is off by default.
    pub headless: bool,
    /// Chrome binary, auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
    pub window_size: (u32, u32),
    /// Wait ceiling for page level lookups.
    pub page_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            chrome_path: None,
            window_size: (1920, 1080),
            page_timeout: Duration::from_millis(PAGE_TIMEOUT_MS),
        }
    }
}
