use std::time::Duration;

use scraper::Selector;

use crate::config::Selectors;
use crate::page::{FieldSelector, Page};
use crate::{Error, Result};

/// One review as read off a card. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewRecord {
    pub author: String,
    pub post_date: String,
    pub likes: String,
    pub rating: String,
    pub text: String,
}

impl ReviewRecord {
    /// Fields in output column order.
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.author,
            &self.post_date,
            &self.likes,
            &self.rating,
            &self.text,
        ]
    }

    /// A record counts only if at least one field was found.
    pub fn is_present(&self) -> bool {
        self.fields().iter().any(|field| !field.is_empty())
    }
}

/// Reads every field of `card` independently. A field that can't be found is left empty,
/// it never stops the remaining fields from being read.
pub fn extract<'a, P: Page>(
    page: &'a P,
    card: &P::Element<'a>,
    selectors: &Selectors,
    timeout: Duration,
) -> ReviewRecord {
    let field = |selector: &FieldSelector| page.lookup(Some(card), selector, timeout);

    ReviewRecord {
        author: field(&selectors.author).into_text(),
        post_date: field(&selectors.post_date).into_text(),
        likes: field(&selectors.likes).into_text(),
        rating: field(&selectors.rating).map(|r| clean_rating(&r)).into_text(),
        text: field(&selectors.text).map(|t| clean_comment(&t)).into_text(),
    }
}

/// Strips the accessibility wording around a rating, e.g. `"Rated 4 stars out of five stars"` -> `"4"`.
/// Wording in other forms is left as is.
pub fn clean_rating(rating: &str) -> String {
    rating
        .to_lowercase()
        .replace("diberi rating", "")
        .replace("rated ", "")
        .replace(" stars out of five stars", "")
        .trim()
        .to_string()
}

/// Joins the lines of a review into one.
pub fn clean_comment(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', " ").trim().to_string()
}

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::InvalidSelector(sel_str.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotPage;

    const FEED: &str = r#"
        <html><body>
        <div class="d15Mdf">
            <span class="X43Kjb">Ann Lee</span>
            <span class="p2TkOb">March 3, 2021</span>
            <div class="pf5lIe"><div role="img" aria-label="Rated 4 stars out of five stars"></div></div>
            <div class="jUL89d">12</div>
            <span jsname="bN97Pc">Great
app!
</span>
        </div>
        <div class="d15Mdf">
            <span class="X43Kjb">Budi</span>
            <div class="pf5lIe"><div role="img" aria-label="Diberi rating 5 bintang dari lima bintang"></div></div>
        </div>
        <div class="d15Mdf"><p>nothing we know about</p></div>
        </body></html>
    "#;

    fn cards() -> Vec<ReviewRecord> {
        let page = SnapshotPage::from_html([FEED]);
        let selectors = Selectors::default();
        let cards = page.find_all(&selectors.card).unwrap();
        let records = cards
            .iter()
            .map(|card| extract(&page, card, &selectors, Duration::ZERO))
            .collect();
        records
    }

    #[test]
    fn extracts_a_complete_card() {
        let records = cards();
        assert_eq!(
            records[0],
            ReviewRecord {
                author: "Ann Lee".into(),
                post_date: "March 3, 2021".into(),
                likes: "12".into(),
                rating: "4".into(),
                text: "Great app!".into(),
            }
        );
    }

    #[test]
    fn missing_fields_are_left_empty() {
        let records = cards();
        let partial = &records[1];
        assert_eq!(partial.author, "Budi");
        assert_eq!(partial.rating, "5 bintang dari lima bintang");
        assert_eq!(partial.post_date, "");
        assert_eq!(partial.likes, "");
        assert_eq!(partial.text, "");
        assert!(partial.is_present());
    }

    #[test]
    fn card_without_any_field_is_not_present() {
        let records = cards();
        assert_eq!(records[2], ReviewRecord::default());
        assert!(!records[2].is_present());
    }

    #[test]
    fn rating_english_label() {
        assert_eq!(clean_rating("Rated 4 stars out of five stars"), "4");
        assert_eq!(clean_rating("  rated 1 stars out of five stars "), "1");
    }

    #[test]
    fn rating_indonesian_prefix_only() {
        assert_eq!(
            clean_rating("Diberi rating 5 bintang dari lima bintang"),
            "5 bintang dari lima bintang"
        );
    }

    #[test]
    fn rating_unknown_suffix_passes_through() {
        assert_eq!(
            clean_rating("Rated 3 stars out of 5 stars"),
            "3 stars out of 5 stars"
        );
    }

    #[test]
    fn comment_lines_are_joined() {
        assert_eq!(clean_comment("Great\napp!\n"), "Great app!");
        assert_eq!(clean_comment("a\r\nb"), "a b");
        assert_eq!(clean_comment("   "), "");
    }
}
