use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::time::Duration;

use scraper::{ElementRef, Html};

use crate::page::{FieldSelector, Lookup, Page, Source};
use crate::parse::create_selector;
use crate::{Error, Result};

/// A [`Page`] replayed from saved HTML.
///
/// Every document is one frame: the feed as it looked after one more scroll.
/// Scrolling (or clicking the load-more button) moves to the next frame, and the
/// scroll offset is the index of the current frame, so once the last frame is
/// reached the feed stalls like a live one would.
pub struct SnapshotPage {
    frames: Vec<Html>,
    current: Cell<usize>,
}

impl SnapshotPage {
    pub fn from_html<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let frames = documents
            .into_iter()
            .map(|doc| Html::parse_document(doc.as_ref()))
            .collect();
        Self {
            frames,
            current: Cell::new(0),
        }
    }

    /// Loads every `*.html` file in `dir`, ordered by file name.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut paths = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.retain(|p| p.extension().is_some_and(|ext| ext == "html"));
        paths.sort();

        let documents = paths
            .iter()
            .map(fs::read_to_string)
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self::from_html(documents))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self) -> Result<&Html> {
        self.frames
            .get(self.current.get())
            .ok_or_else(|| Error::Browser("no frames loaded".into()))
    }

    fn advance(&self) {
        let next = self.current.get() + 1;
        if next < self.frames.len() {
            self.current.set(next);
        }
    }
}

fn read(element: ElementRef<'_>, source: &Source) -> Lookup {
    match source {
        Source::Text => Lookup::Found(element.text().collect::<String>().trim().to_string()),
        Source::Attribute(name) => element.value().attr(name).map(str::to_string).into(),
    }
}

impl Page for SnapshotPage {
    type Element<'a> = ElementRef<'a>;

    fn navigate(&self, url: &str) -> Result<()> {
        if self.frames.is_empty() {
            return Err(Error::Navigation {
                url: url.into(),
                reason: "snapshot has no frames".into(),
            });
        }
        self.current.set(0);
        Ok(())
    }

    fn find_all<'a>(&'a self, selector: &str) -> Result<Vec<ElementRef<'a>>> {
        let selector = create_selector(selector)?;
        Ok(self.frame()?.select(&selector).collect())
    }

    fn find_one<'a>(&'a self, selector: &str, _timeout: Duration) -> Option<ElementRef<'a>> {
        let selector = create_selector(selector).ok()?;
        self.frame().ok()?.select(&selector).next()
    }

    fn lookup<'a>(
        &'a self,
        scope: Option<&ElementRef<'a>>,
        field: &FieldSelector,
        _timeout: Duration,
    ) -> Lookup {
        let Ok(selector) = create_selector(&field.css) else {
            return Lookup::Absent;
        };
        let found = match scope {
            Some(card) => card.select(&selector).next(),
            None => match self.frame() {
                Ok(frame) => frame.select(&selector).next(),
                Err(_) => None,
            },
        };
        match found {
            Some(element) => read(element, &field.source),
            None => Lookup::Absent,
        }
    }

    fn click<'a>(&'a self, _element: &ElementRef<'a>) -> Result<()> {
        self.advance();
        Ok(())
    }

    fn scroll_offset(&self) -> Result<i64> {
        Ok(self.current.get() as i64)
    }

    fn scroll_to_bottom(&self) -> Result<()> {
        self.advance();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_walks_frames_then_stops() {
        let page = SnapshotPage::from_html(["<p>1</p>", "<p>2</p>"]);
        page.navigate("about:blank").unwrap();
        assert_eq!(page.scroll_offset().unwrap(), 0);
        page.scroll_to_bottom().unwrap();
        assert_eq!(page.scroll_offset().unwrap(), 1);
        page.scroll_to_bottom().unwrap();
        assert_eq!(page.scroll_offset().unwrap(), 1);
    }

    #[test]
    fn empty_snapshot_cannot_be_navigated() {
        let page = SnapshotPage::from_html(Vec::<String>::new());
        assert!(matches!(
            page.navigate("https://example.com"),
            Err(Error::Navigation { .. })
        ));
    }

    #[test]
    fn page_wide_lookup_reads_attribute() {
        let page = SnapshotPage::from_html([r#"<a class="x" href="/next">more</a>"#]);
        let href = page.lookup(None, &FieldSelector::attribute("a.x", "href"), Duration::ZERO);
        assert_eq!(href, Lookup::Found("/next".into()));
        let missing = page.lookup(None, &FieldSelector::attribute("a.x", "title"), Duration::ZERO);
        assert_eq!(missing, Lookup::Absent);
    }

    #[test]
    fn frames_load_from_dir_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("02.html"), "<h1>second</h1>").unwrap();
        fs::write(dir.path().join("01.html"), "<h1>first</h1>").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let page = SnapshotPage::from_dir(dir.path()).unwrap();
        assert_eq!(page.frame_count(), 2);
        let h1 = FieldSelector::text("h1");
        assert_eq!(page.lookup(None, &h1, Duration::ZERO).into_text(), "first");
        page.scroll_to_bottom().unwrap();
        assert_eq!(page.lookup(None, &h1, Duration::ZERO).into_text(), "second");
    }
}
