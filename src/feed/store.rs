use tracing::{debug, info, warn};

use crate::live::ConnectionState;
use crate::news::Category;

use super::{Effect, FeedState, LoadOutcome, Msg};

/// Owner of every feed's state and of the shared channel status.
///
/// [`update`](FeedStore::update) is the single entry point for mutation;
/// callers only ever read through the accessors.
#[derive(Debug, Clone)]
pub struct FeedStore {
    feeds: Vec<FeedState>,
    connection: ConnectionState,
}

impl FeedStore {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut feeds: Vec<FeedState> = Vec::new();
        for category in categories {
            if feeds.iter().all(|f| f.category() != &category) {
                feeds.push(FeedState::new(category));
            }
        }
        Self {
            feeds,
            connection: ConnectionState::Connecting,
        }
    }

    pub fn feeds(&self) -> &[FeedState] {
        &self.feeds
    }

    pub fn feed(&self, category: &Category) -> Option<&FeedState> {
        self.feeds.iter().find(|f| f.category() == category)
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Apply one message and return the effects it calls for.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::LoadPage { category, page } => {
                let Some(feed) = self.feed_mut(&category) else {
                    return Vec::new();
                };
                let (page, ticket) = feed.begin_load(page);
                debug!(feed = category.slug(), page, "page requested");
                vec![Effect::FetchPage {
                    category,
                    page,
                    ticket,
                }]
            }
            Msg::PageLoaded {
                category,
                ticket,
                result,
            } => {
                let Some(feed) = self.feed_mut(&category) else {
                    return Vec::new();
                };
                let error = result.as_ref().err().cloned();
                match feed.finish_load(ticket, result) {
                    LoadOutcome::Applied => {
                        info!(
                            feed = category.slug(),
                            page = feed.page(),
                            total = feed.total(),
                            "page loaded"
                        );
                        vec![Effect::ScrollToTop { category }]
                    }
                    LoadOutcome::Failed => {
                        warn!(
                            feed = category.slug(),
                            error = error.as_deref().unwrap_or_default(),
                            "page load failed"
                        );
                        Vec::new()
                    }
                    LoadOutcome::Stale => {
                        debug!(feed = category.slug(), "stale page response dropped");
                        Vec::new()
                    }
                }
            }
            Msg::LiveItem { category, item } => {
                let Some(feed) = self.feed_mut(&category) else {
                    return Vec::new();
                };
                let link = item.link.clone();
                if feed.push_live(item) {
                    debug!(feed = category.slug(), %link, "live item buffered");
                } else {
                    debug!(feed = category.slug(), %link, "duplicate live item ignored");
                }
                Vec::new()
            }
            Msg::Connection(state) => {
                if self.connection != state {
                    info!(from = ?self.connection, to = ?state, "channel state");
                    self.connection = state;
                }
                Vec::new()
            }
            Msg::PromotePending { category } => {
                let Some(feed) = self.feed_mut(&category) else {
                    return Vec::new();
                };
                let count = feed.pending_len();
                if feed.promote_pending() {
                    info!(feed = category.slug(), count, "pending items merged");
                    vec![Effect::ScrollToTop { category }]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn feed_mut(&mut self, category: &Category) -> Option<&mut FeedState> {
        let feed = self.feeds.iter_mut().find(|f| f.category() == category);
        if feed.is_none() {
            warn!(feed = category.slug(), "message for unknown feed ignored");
        }
        feed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::PageTicket;
    use crate::news::{make_item, NewsItem, NewsPage};

    fn world() -> Category {
        Category::primary("world")
    }

    fn store() -> FeedStore {
        FeedStore::new([world(), Category::secondary("yemen")])
    }

    fn request(store: &mut FeedStore, category: &Category, page: u32) -> PageTicket {
        let effects = store.update(Msg::LoadPage {
            category: category.clone(),
            page,
        });
        match effects.as_slice() {
            [Effect::FetchPage { ticket, .. }] => *ticket,
            other => panic!("expected one FetchPage, got {other:?}"),
        }
    }

    fn respond(
        store: &mut FeedStore,
        category: &Category,
        ticket: PageTicket,
        items: &[&str],
        total: u64,
        page: u32,
    ) -> Vec<Effect> {
        store.update(Msg::PageLoaded {
            category: category.clone(),
            ticket,
            result: Ok(NewsPage {
                items: items.iter().map(|l| make_item(l)).collect(),
                total,
                page: Some(page),
            }),
        })
    }

    fn push(store: &mut FeedStore, category: &Category, link: &str) {
        store.update(Msg::LiveItem {
            category: category.clone(),
            item: make_item(link),
        });
    }

    fn links<'a>(items: impl IntoIterator<Item = &'a NewsItem>) -> Vec<&'a str> {
        items.into_iter().map(|i| i.link.as_str()).collect()
    }

    #[test]
    fn new_store_is_connecting_with_one_state_per_feed() {
        let store = FeedStore::new([world(), world(), Category::secondary("yemen")]);
        assert_eq!(store.feeds().len(), 2);
        assert_eq!(store.connection(), ConnectionState::Connecting);
    }

    #[test]
    fn end_to_end_fetch_push_merge() {
        let mut store = store();
        let world = world();

        let ticket = request(&mut store, &world, 1);
        respond(&mut store, &world, ticket, &["A", "B"], 2, 1);
        assert_eq!(links(store.feed(&world).unwrap().visible()), vec!["A", "B"]);

        push(&mut store, &world, "C");
        let feed = store.feed(&world).unwrap();
        assert_eq!(links(feed.pending()), vec!["C"]);
        assert_eq!(feed.pending_banner(), Some(1));

        push(&mut store, &world, "A");
        assert_eq!(links(store.feed(&world).unwrap().pending()), vec!["C"]);

        let effects = store.update(Msg::PromotePending {
            category: world.clone(),
        });
        assert_eq!(
            effects,
            vec![Effect::ScrollToTop {
                category: world.clone()
            }]
        );
        let feed = store.feed(&world).unwrap();
        assert_eq!(links(feed.visible()), vec!["C", "A", "B"]);
        assert_eq!(feed.pending_len(), 0);
        assert_eq!(feed.page(), 1);
    }

    #[test]
    fn stale_page_one_response_loses_to_page_two() {
        let mut store = store();
        let world = world();

        let first = request(&mut store, &world, 1);
        let second = request(&mut store, &world, 2);
        respond(&mut store, &world, second, &["p2"], 45, 2);
        let effects = respond(&mut store, &world, first, &["p1"], 45, 1);

        assert!(effects.is_empty());
        let feed = store.feed(&world).unwrap();
        assert_eq!(feed.page(), 2);
        assert_eq!(links(feed.visible()), vec!["p2"]);
    }

    #[test]
    fn failed_load_emits_nothing_and_clears_loading() {
        let mut store = store();
        let world = world();
        let ticket = request(&mut store, &world, 1);

        let effects = store.update(Msg::PageLoaded {
            category: world.clone(),
            ticket,
            result: Err("timeout".into()),
        });

        assert!(effects.is_empty());
        assert!(!store.feed(&world).unwrap().is_loading());
    }

    #[test]
    fn feeds_are_independent() {
        let mut store = store();
        let world = world();
        let yemen = Category::secondary("yemen");

        push(&mut store, &world, "X");
        push(&mut store, &yemen, "X");

        assert_eq!(store.feed(&world).unwrap().pending_len(), 1);
        assert_eq!(store.feed(&yemen).unwrap().pending_len(), 1);
        store.update(Msg::PromotePending {
            category: yemen.clone(),
        });
        assert_eq!(store.feed(&world).unwrap().pending_len(), 1);
    }

    #[test]
    fn pending_isolation_under_many_pushes() {
        let mut store = store();
        let world = world();
        let ticket = request(&mut store, &world, 1);
        respond(&mut store, &world, ticket, &["a", "b", "c"], 3, 1);
        let before = store.feed(&world).unwrap().visible().to_vec();

        let incoming = ["d", "a", "e", "d", "f", "c", "g"];
        for link in incoming {
            push(&mut store, &world, link);
        }

        let feed = store.feed(&world).unwrap();
        assert_eq!(feed.visible(), before.as_slice());
        assert_eq!(links(feed.pending()), vec!["g", "f", "e", "d"]);
        assert_eq!(feed.total(), 7);
    }

    #[test]
    fn no_duplicate_links_across_interleavings() {
        let mut store = store();
        let world = world();

        let t1 = request(&mut store, &world, 1);
        push(&mut store, &world, "a");
        push(&mut store, &world, "z");
        respond(&mut store, &world, t1, &["a", "b", "c"], 3, 1);
        push(&mut store, &world, "b");
        push(&mut store, &world, "d");
        push(&mut store, &world, "d");
        store.update(Msg::PromotePending {
            category: world.clone(),
        });
        push(&mut store, &world, "d");
        push(&mut store, &world, "e");

        let feed = store.feed(&world).unwrap();
        let mut all: Vec<&str> = links(feed.visible());
        all.extend(links(feed.pending()));
        let mut deduped = all.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(all.len(), deduped.len(), "duplicates in {all:?}");
    }

    #[test]
    fn connection_transitions_are_recorded() {
        let mut store = store();
        store.update(Msg::Connection(ConnectionState::Connected));
        assert_eq!(store.connection(), ConnectionState::Connected);
        store.update(Msg::Connection(ConnectionState::Disconnected));
        assert_eq!(store.connection(), ConnectionState::Disconnected);
    }

    #[test]
    fn unknown_feed_is_ignored() {
        let mut store = store();
        let effects = store.update(Msg::LoadPage {
            category: Category::secondary("mars"),
            page: 1,
        });
        assert!(effects.is_empty());
    }

    #[test]
    fn merge_with_nothing_pending_emits_nothing() {
        let mut store = store();
        let effects = store.update(Msg::PromotePending { category: world() });
        assert!(effects.is_empty());
    }
}
