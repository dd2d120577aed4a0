use std::path::PathBuf;

use chrono::Local;
use tracing::debug;

use crate::config::CrawlConfig;
use crate::dedup::{RecordIdentity, SeenSet};
use crate::output::ReviewWriter;
use crate::page::{Lookup, Page};
use crate::parse::extract;
use crate::scroll::{ScrollController, ScrollState};
use crate::{info_time, Error, Result};

/// What a finished crawl produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub entity: String,
    pub path: PathBuf,
    /// Distinct reviews written.
    pub written: usize,
    /// Cards skipped because their review was already written.
    pub duplicates: usize,
    /// Cards skipped because none of their fields could be read.
    pub empty: usize,
    /// Extraction passes over the feed.
    pub passes: usize,
}

/// Crawls the review feed at `url` until it runs dry, streaming every distinct review
/// into `<output_dir>/<entity>.csv`.
///
/// Only failing to load the page or to find the entity's name is fatal, and both happen
/// before the output file is touched.
pub fn crawl<P: Page>(page: &P, url: &str, config: &CrawlConfig) -> Result<CrawlReport> {
    let start_time = Local::now();
    config.validate()?;
    let selectors = &config.selectors;

    page.navigate(url).map_err(|err| match err {
        nav @ Error::Navigation { .. } => nav,
        other => Error::Navigation {
            url: url.into(),
            reason: other.to_string(),
        },
    })?;
    let entity = match page.lookup(None, &selectors.entity_name, config.name_timeout) {
        Lookup::Found(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => return Err(Error::MissingEntityName(selectors.entity_name.css.clone())),
    };
    info_time!("Crawling reviews of {entity}");

    let mut state = ScrollState::new(page.scroll_offset()?);
    let mut writer = ReviewWriter::create(&config.output_dir, &entity)?;
    let mut seen = SeenSet::new();
    let controller = ScrollController::new(
        &selectors.load_more,
        config.scroll_dwell,
        config.stall_dwell,
        config.lookup_timeout,
    );

    let mut duplicates = 0;
    let mut empty = 0;
    let mut passes = 0;
    while state.loading() {
        passes += 1;
        let pass_time = Local::now();
        let written_before = writer.written();

        let cards = page.find_all(&selectors.card)?;
        let window = &cards[cards.len().saturating_sub(config.lookback)..];
        for card in window {
            let record = extract(page, card, selectors, config.lookup_timeout);
            if !record.is_present() {
                empty += 1;
                continue;
            }
            let id = RecordIdentity::new(&record, config.identity);
            if !seen.is_novel(&id) {
                debug!(author = %record.author, "already extracted");
                duplicates += 1;
                continue;
            }
            seen.insert(id);
            writer.append(&record)?;
        }
        info_time!(
            pass_time,
            "Pass {}: {} cards, {} new reviews",
            passes,
            window.len(),
            writer.written() - written_before
        );

        state = controller.check(page, state)?;
    }

    info_time!(
        start_time,
        "DONE: {} reviews of {} written to {}",
        writer.written(),
        entity,
        writer.path().display()
    );

    Ok(CrawlReport {
        path: writer.path().to_path_buf(),
        written: writer.written(),
        entity,
        duplicates,
        empty,
        passes,
    })
}
