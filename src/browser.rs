use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::{Browser, Element as ChromeElement, LaunchOptions, Tab};
use tracing::{debug, info};

use crate::config::BrowserConfig;
use crate::page::{FieldSelector, Lookup, Page, Source};
use crate::{Error, Result};

const SCROLL_OFFSET_JS: &str = "window.pageYOffset";
const SCROLL_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight);";
/// The connection is dropped after this long without CDP traffic; must outlast every dwell.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(600);

/// A [`Page`] backed by a Chrome tab driven over CDP.
///
/// Owns the browser process: dropping the session shuts Chrome down, whichever way the
/// crawl ended.
pub struct ChromePage {
    tab: Arc<Tab>,
    _browser: Browser,
}

impl ChromePage {
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let args: Vec<&OsStr> = vec![
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--lang=en-US"),
        ];
        let browser = Browser::new(LaunchOptions {
            headless: config.headless,
            window_size: Some(config.window_size),
            path: config.chrome_path.clone(),
            idle_browser_timeout: IDLE_BROWSER_TIMEOUT,
            args,
            ..Default::default()
        })
        .map_err(browser_err)?;

        let tab = browser.new_tab().map_err(browser_err)?;
        tab.set_default_timeout(config.page_timeout);
        info!(headless = config.headless, "browser session started");

        Ok(Self {
            tab,
            _browser: browser,
        })
    }

    fn evaluate_number(&self, script: &str) -> Result<f64> {
        self.tab
            .evaluate(script, false)
            .map_err(browser_err)?
            .value
            .and_then(|value| value.as_f64())
            .ok_or_else(|| Error::ScriptValue(script.into()))
    }
}

fn browser_err(err: impl std::fmt::Display) -> Error {
    Error::Browser(err.to_string())
}

fn read(element: &ChromeElement<'_>, source: &Source) -> Lookup {
    let value = match source {
        Source::Text => element.get_inner_text().ok(),
        Source::Attribute(name) => element.get_attribute_value(name).ok().flatten(),
    };
    value.into()
}

impl Page for ChromePage {
    type Element<'a> = ChromeElement<'a>;

    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|err| Error::Navigation {
                url: url.into(),
                reason: err.to_string(),
            })?;
        Ok(())
    }

    fn find_all<'a>(&'a self, selector: &str) -> Result<Vec<ChromeElement<'a>>> {
        // The tab reports "no element found" as an error; for a batch that's just an empty one.
        match self.tab.find_elements(selector) {
            Ok(elements) => Ok(elements),
            Err(err) if err.is::<NoElementFound>() => {
                debug!(selector, "no elements");
                Ok(Vec::new())
            }
            Err(err) => Err(browser_err(err)),
        }
    }

    fn find_one<'a>(&'a self, selector: &str, timeout: Duration) -> Option<ChromeElement<'a>> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .ok()
    }

    fn lookup<'a>(
        &'a self,
        scope: Option<&ChromeElement<'a>>,
        field: &FieldSelector,
        timeout: Duration,
    ) -> Lookup {
        let found = match scope {
            Some(card) => card.wait_for_element_with_custom_timeout(&field.css, timeout),
            None => self
                .tab
                .wait_for_element_with_custom_timeout(&field.css, timeout),
        };
        match found {
            Ok(element) => read(&element, &field.source),
            Err(_) => Lookup::Absent,
        }
    }

    fn click<'a>(&'a self, element: &ChromeElement<'a>) -> Result<()> {
        element.click().map_err(browser_err)?;
        Ok(())
    }

    fn scroll_offset(&self) -> Result<i64> {
        Ok(self.evaluate_number(SCROLL_OFFSET_JS)?.round() as i64)
    }

    fn scroll_to_bottom(&self) -> Result<()> {
        self.tab
            .evaluate(SCROLL_BOTTOM_JS, false)
            .map_err(browser_err)?;
        Ok(())
    }
}
