use std::thread::sleep;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::page::Page;
use crate::{Result, STALL_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The offset moved on the last check.
    Advancing,
    /// The offset hasn't moved for `stall_count` checks, below the limit.
    Stalled,
    /// No more content. Terminal.
    Exhausted,
}

/// What the controller should do after an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    /// First stall: press the load-more button if there is one, otherwise just wait.
    LoadMore,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub last_offset: i64,
    pub stall_count: u32,
    pub phase: Phase,
}

impl ScrollState {
    pub fn new(offset: i64) -> Self {
        Self {
            last_offset: offset,
            stall_count: 0,
            phase: Phase::Advancing,
        }
    }

    /// Whether the crawl should keep going.
    pub fn loading(&self) -> bool {
        self.phase != Phase::Exhausted
    }

    /// Feeds one offset measurement through the state machine.
    pub fn observe(self, offset: i64) -> (ScrollState, Action) {
        if self.phase == Phase::Exhausted {
            return (self, Action::Stop);
        }
        if offset != self.last_offset {
            return (ScrollState::new(offset), Action::Continue);
        }

        let stall_count = self.stall_count + 1;
        if stall_count >= STALL_LIMIT {
            let state = ScrollState {
                stall_count,
                phase: Phase::Exhausted,
                ..self
            };
            return (state, Action::Stop);
        }
        let state = ScrollState {
            stall_count,
            phase: Phase::Stalled,
            ..self
        };
        (state, Action::LoadMore)
    }
}

/// Drives the scroll loop of a page: scrolls, lets the content settle, measures.
pub struct ScrollController<'s> {
    load_more: &'s str,
    scroll_dwell: Duration,
    stall_dwell: Duration,
    lookup_timeout: Duration,
}

impl<'s> ScrollController<'s> {
    pub fn new(
        load_more: &'s str,
        scroll_dwell: Duration,
        stall_dwell: Duration,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            load_more,
            scroll_dwell,
            stall_dwell,
            lookup_timeout,
        }
    }

    /// Runs one check cycle and returns the next state.
    ///
    /// The dwell before measuring is what keeps a slow load from reading as a stall.
    pub fn check<P: Page>(&self, page: &P, state: ScrollState) -> Result<ScrollState> {
        page.scroll_to_bottom()?;
        sleep(self.scroll_dwell);
        let offset = page.scroll_offset()?;

        let (next, action) = state.observe(offset);
        match action {
            Action::Continue => debug!(offset, "scrolled"),
            Action::LoadMore => {
                info!(offset, stalls = next.stall_count, "scroll stalled");
                sleep(self.stall_dwell);
                self.press_load_more(page);
            }
            Action::Stop => {
                info!(offset, stalls = next.stall_count, "feed exhausted");
                sleep(self.stall_dwell);
            }
        }
        Ok(next)
    }

    /// A button that can't be clicked is treated like a missing one.
    fn press_load_more<P: Page>(&self, page: &P) {
        let Some(button) = page.find_one(self.load_more, self.lookup_timeout) else {
            debug!("no load more button, waiting one more round");
            return;
        };
        info!("clicking load more");
        if let Err(err) = page.click(&button) {
            warn!(%err, "load more click failed");
        }
    }
}
