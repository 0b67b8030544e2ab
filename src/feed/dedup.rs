use std::collections::HashSet;

use crate::news::NewsItem;

/// Set of links currently known to a feed (`visible ∪ pending`).
///
/// The owning [`FeedState`](super::FeedState) rebuilds it after every bulk
/// mutation and inserts into it for single live arrivals, so a lookup always
/// reflects the two sequences as they are right now.
#[derive(Debug, Default, Clone)]
pub struct DedupIndex {
    links: HashSet<String>,
}

impl DedupIndex {
    pub fn build<'a>(items: impl IntoIterator<Item = &'a NewsItem>) -> Self {
        Self {
            links: items.into_iter().map(|item| item.link.clone()).collect(),
        }
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Record a link.  Returns `false` if it was already known.
    pub(super) fn insert(&mut self, link: &str) -> bool {
        if self.links.contains(link) {
            return false;
        }
        self.links.insert(link.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::make_item;

    #[test]
    fn build_collects_links_across_sequences() {
        let visible = vec![make_item("https://a"), make_item("https://b")];
        let pending = vec![make_item("https://c")];
        let index = DedupIndex::build(visible.iter().chain(pending.iter()));

        assert!(index.contains("https://a"));
        assert!(index.contains("https://c"));
        assert!(!index.contains("https://d"));
    }

    #[test]
    fn link_comparison_is_exact() {
        let items = vec![make_item("https://example.com/Story")];
        let index = DedupIndex::build(&items);

        assert!(index.contains("https://example.com/Story"));
        assert!(!index.contains("https://example.com/story"));
        assert!(!index.contains("https://example.com/Story/"));
    }

    #[test]
    fn insert_reports_duplicates() {
        let mut index = DedupIndex::default();
        assert!(index.insert("https://a"));
        assert!(!index.insert("https://a"));
        assert!(index.contains("https://a"));
    }
}
