use std::time::Duration;

use crate::Result;

/// Outcome of a single element lookup. A missing element is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    Absent,
}

impl Lookup {
    /// Collapses the lookup into the text, or an empty string when nothing was found.
    pub fn into_text(self) -> String {
        match self {
            Lookup::Found(text) => text,
            Lookup::Absent => String::new(),
        }
    }

    pub fn map(self, f: impl FnOnce(String) -> String) -> Lookup {
        match self {
            Lookup::Found(text) => Lookup::Found(f(text)),
            Lookup::Absent => Lookup::Absent,
        }
    }
}

impl From<Option<String>> for Lookup {
    fn from(value: Option<String>) -> Self {
        value.map_or(Lookup::Absent, Lookup::Found)
    }
}

/// Where the value of a located element comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// The rendered text of the element.
    Text,
    /// The value of the named attribute.
    Attribute(String),
}

/// CSS selector of one field plus where to read its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    pub css: String,
    pub source: Source,
}

impl FieldSelector {
    pub fn text(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            source: Source::Text,
        }
    }

    pub fn attribute(css: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            source: Source::Attribute(name.into()),
        }
    }
}

/// Everything the crawl needs from a rendered page.
///
/// Implementations are blocking. `Element<'a>` borrows the page, so cards from one pass
/// can't outlive the page they were found on.
pub trait Page {
    type Element<'a>
    where
        Self: 'a;

    /// Loads `url`. Failure here is fatal for the whole crawl.
    fn navigate(&self, url: &str) -> Result<()>;

    /// Every element on the page matching `selector`, in document order.
    fn find_all<'a>(&'a self, selector: &str) -> Result<Vec<Self::Element<'a>>>;

    /// First element on the page matching `selector`, waiting at most `timeout` for it.
    fn find_one<'a>(&'a self, selector: &str, timeout: Duration) -> Option<Self::Element<'a>>;

    /// Reads `field` inside `scope`, or page wide when `scope` is `None`.
    fn lookup<'a>(
        &'a self,
        scope: Option<&Self::Element<'a>>,
        field: &FieldSelector,
        timeout: Duration,
    ) -> Lookup;

    fn click<'a>(&'a self, element: &Self::Element<'a>) -> Result<()>;

    /// Current vertical scroll position.
    fn scroll_offset(&self) -> Result<i64>;

    fn scroll_to_bottom(&self) -> Result<()>;
}
