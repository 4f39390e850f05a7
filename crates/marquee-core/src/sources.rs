//! Transient source list for one movie/series edit.
//!
//! The list is only written back to the catalog when the edit is
//! committed, and then replaces the entry's `sources` wholesale.

use tracing::debug;

use crate::error::MarqueeError;
use crate::models::Source;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceList {
    items: Vec<Source>,
}

impl SourceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources(items: Vec<Source>) -> Self {
        Self { items }
    }

    /// Append a video source. Returns `false` (and does nothing) when the
    /// url is blank.
    pub fn add(&mut self, title: &str, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }
        self.items.push(Source::video(title.trim(), url));
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Source, MarqueeError> {
        if index >= self.items.len() {
            return Err(MarqueeError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Insert at the front unless a source with the same url is already
    /// present. Returns whether it was inserted.
    pub fn prepend_unique(&mut self, source: Source) -> bool {
        if self.items.iter().any(|s| s.url() == source.url()) {
            debug!(url = source.url(), "Source already present");
            return false;
        }
        self.items.insert(0, source);
        true
    }

    pub fn as_slice(&self) -> &[Source] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_inner(self) -> Vec<Source> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;

    #[test]
    fn test_add_blank_is_noop() {
        let mut list = SourceList::new();
        assert!(!list.add("", ""));
        assert!(!list.add("Name", "   "));
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_trims_and_tags_video() {
        let mut list = SourceList::new();
        assert!(list.add("  Mirror ", " https://m/1 "));

        let source = &list.as_slice()[0];
        assert_eq!(source.title(), Some("Mirror"));
        assert_eq!(source.url(), "https://m/1");
        assert_eq!(source.kind(), Some(SourceKind::Video));
    }

    #[test]
    fn test_add_then_remove() {
        let mut list = SourceList::new();
        list.add("Name", "http://x");
        let removed = list.remove_at(0).unwrap();
        assert_eq!(removed.url(), "http://x");
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut list = SourceList::new();
        list.add("a", "http://a");
        list.add("b", "http://b");
        list.add("c", "http://c");
        list.remove_at(1).unwrap();

        let urls: Vec<&str> = list.as_slice().iter().map(Source::url).collect();
        assert_eq!(urls, vec!["http://a", "http://c"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut list = SourceList::new();
        list.add("a", "http://a");
        assert!(matches!(
            list.remove_at(1),
            Err(MarqueeError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_prepend_unique_is_idempotent() {
        let mut list = SourceList::new();
        list.add("mine", "http://mine");

        let embed = Source::video("vidsrc.net", "https://vidsrc.net/embed/movie?tmdb=42");
        assert!(list.prepend_unique(embed.clone()));
        assert!(!list.prepend_unique(embed));

        assert_eq!(list.len(), 2);
        assert_eq!(list.as_slice()[0].title(), Some("vidsrc.net"));
        assert_eq!(list.as_slice()[1].url(), "http://mine");
    }
}
