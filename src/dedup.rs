use std::collections::HashSet;

use crate::parse::ReviewRecord;

/// How a record's fields are folded into its identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityScheme {
    /// Fields glued together with no separator.
    /// `("ab", "")` and `("a", "b")` collide; distinct reviews can be merged.
    #[default]
    Concat,
    /// Every field written as `<byte len>:<field>`, so boundaries can't shift.
    LengthPrefixed,
}

/// Key used to spot a review that was already written during this crawl.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordIdentity(String);

impl RecordIdentity {
    pub fn new(record: &ReviewRecord, scheme: IdentityScheme) -> Self {
        let fields = record.fields();
        let id = match scheme {
            IdentityScheme::Concat => fields.concat(),
            IdentityScheme::LengthPrefixed => fields
                .iter()
                .map(|field| format!("{}:{field}", field.len()))
                .collect(),
        };
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identities seen during one crawl. Only ever grows.
#[derive(Debug, Default)]
pub struct SeenSet {
    seen: HashSet<RecordIdentity>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_novel(&self, id: &RecordIdentity) -> bool {
        !self.seen.contains(id)
    }

    /// Records `id`, returning `true` the first time it is seen.
    pub fn insert(&mut self, id: RecordIdentity) -> bool {
        self.seen.insert(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(author: &str, post_date: &str) -> ReviewRecord {
        ReviewRecord {
            author: author.into(),
            post_date: post_date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn identity_is_the_fields_in_order() {
        let rec = ReviewRecord {
            author: "Ann".into(),
            post_date: "May 1, 2021".into(),
            likes: "3".into(),
            rating: "5".into(),
            text: "Great".into(),
        };
        let id = RecordIdentity::new(&rec, IdentityScheme::Concat);
        assert_eq!(id.as_str(), "AnnMay 1, 202135Great");
    }

    #[test]
    fn concat_merges_shifted_boundaries() {
        let a = RecordIdentity::new(&record("ab", ""), IdentityScheme::Concat);
        let b = RecordIdentity::new(&record("a", "b"), IdentityScheme::Concat);
        assert_eq!(a, b);
    }

    #[test]
    fn length_prefix_keeps_shifted_boundaries_apart() {
        let a = RecordIdentity::new(&record("ab", ""), IdentityScheme::LengthPrefixed);
        let b = RecordIdentity::new(&record("a", "b"), IdentityScheme::LengthPrefixed);
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "2:ab0:0:0:0:");
    }

    #[test]
    fn seen_set_admits_each_identity_once() {
        let mut seen = SeenSet::new();
        let id = RecordIdentity::new(&record("Ann", "today"), IdentityScheme::Concat);

        assert!(seen.is_novel(&id));
        assert!(seen.insert(id.clone()));
        assert!(!seen.is_novel(&id));
        assert!(!seen.insert(id));
        assert_eq!(seen.len(), 1);
    }
}
