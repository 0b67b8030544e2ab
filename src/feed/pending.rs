//! Pending buffer: live arrivals held back from the page on screen.

use crate::news::NewsItem;

use super::FeedState;

impl FeedState {
    /// Buffer a live item.  Known links are dropped silently.
    ///
    /// Never touches `visible`; the reader's page only changes on an
    /// explicit merge.  Returns whether the item was accepted.
    pub fn push_live(&mut self, item: NewsItem) -> bool {
        if !self.index.insert(&item.link) {
            return false;
        }
        self.pending.push_front(item);
        self.total += 1;
        true
    }

    /// Count for the "new items" banner.  Only shown on page 1, since a
    /// merge lands at the head of the first page.
    pub fn pending_banner(&self) -> Option<usize> {
        (self.page == 1 && !self.pending.is_empty()).then_some(self.pending.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::feed::FeedState;
    use crate::news::{make_item, Category, NewsPage};

    fn loaded(links: &[&str], page: u32) -> FeedState {
        let mut feed = FeedState::new(Category::primary("world"));
        let (_, ticket) = feed.begin_load(page);
        feed.finish_load(
            ticket,
            Ok(NewsPage {
                items: links.iter().map(|l| make_item(l)).collect(),
                total: 45,
                page: Some(page),
            }),
        );
        feed
    }

    #[test]
    fn push_live_prepends_and_bumps_total() {
        let mut feed = loaded(&["a", "b"], 1);
        assert!(feed.push_live(make_item("c")));
        assert!(feed.push_live(make_item("d")));

        let pending: Vec<_> = feed.pending().map(|i| i.link.as_str()).collect();
        assert_eq!(pending, vec!["d", "c"], "arrival order, newest first");
        assert_eq!(feed.total(), 47);
    }

    #[test]
    fn push_live_never_touches_visible() {
        let mut feed = loaded(&["a", "b"], 1);
        let before = feed.visible().to_vec();
        for link in ["c", "d", "e"] {
            feed.push_live(make_item(link));
        }
        assert_eq!(feed.visible(), before.as_slice());
        assert_eq!(feed.pending_len(), 3);
    }

    #[test]
    fn duplicates_of_visible_or_pending_are_ignored() {
        let mut feed = loaded(&["a", "b"], 1);
        assert!(!feed.push_live(make_item("a")), "already visible");
        assert!(feed.push_live(make_item("c")));
        assert!(!feed.push_live(make_item("c")), "already pending");

        assert_eq!(feed.pending_len(), 1);
        assert_eq!(feed.total(), 46);
    }

    #[test]
    fn banner_only_on_first_page() {
        let mut first = loaded(&["a"], 1);
        assert_eq!(first.pending_banner(), None);
        first.push_live(make_item("c"));
        assert_eq!(first.pending_banner(), Some(1));

        let mut second = loaded(&["a"], 2);
        second.push_live(make_item("c"));
        assert_eq!(second.pending_len(), 1);
        assert_eq!(second.pending_banner(), None);
    }
}
