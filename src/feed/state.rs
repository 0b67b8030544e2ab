use std::collections::VecDeque;

use crate::news::{Category, NewsItem};

use super::DedupIndex;

/// Per-feed state: the page on screen, the live buffer, and pagination.
///
/// Fields are private; the only way to change them is through the
/// operations split across this module's siblings:
///
/// * `fetch.rs`: [`begin_load`](FeedState::begin_load) and
///   [`finish_load`](FeedState::finish_load), the paginated fetch controller
/// * `pending.rs`: [`push_live`](FeedState::push_live), the live buffer
/// * `merge.rs`: [`promote_pending`](FeedState::promote_pending)
///
/// Every one of them leaves `visible ∪ pending` free of duplicate links.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub(super) category: Category,
    /// Current page, newest first, at most [`PAGE_SIZE`](crate::news::PAGE_SIZE) long.
    pub(super) visible: Vec<NewsItem>,
    /// Live arrivals not yet shown, newest (most recently received) first.
    pub(super) pending: VecDeque<NewsItem>,
    pub(super) page: u32,
    pub(super) total: u64,
    pub(super) loading: bool,
    /// The most recent page request: its ticket and the page it asked for.
    pub(super) latest_request: Option<(PageTicket, u32)>,
    pub(super) next_ticket: u64,
    pub(super) index: DedupIndex,
}

/// Identifies one page request so its response can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageTicket(pub(super) u64);

impl FeedState {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            visible: Vec::new(),
            pending: VecDeque::new(),
            page: 1,
            total: 0,
            loading: false,
            latest_request: None,
            next_ticket: 0,
            index: DedupIndex::default(),
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn visible(&self) -> &[NewsItem] {
        &self.visible
    }

    pub fn pending(&self) -> impl Iterator<Item = &NewsItem> {
        self.pending.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Rebuild the dedup index from the current sequences.
    pub(super) fn reindex(&mut self) {
        self.index = DedupIndex::build(self.visible.iter().chain(self.pending.iter()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_feed_starts_on_first_page_empty() {
        let feed = FeedState::new(Category::primary("world"));
        assert!(feed.visible().is_empty());
        assert_eq!(feed.pending_len(), 0);
        assert_eq!(feed.page(), 1);
        assert_eq!(feed.total(), 0);
        assert!(!feed.is_loading());
        assert_eq!(feed.category().slug(), "world");
    }
}
