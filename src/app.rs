use ratatui::widgets::ListState;

use crate::feed::{Effect, FeedState, FeedStore, Msg};
use crate::live::ConnectionState;
use crate::news::Category;

/// UI-side state: which feed is on screen, the selection within it, and the
/// status line.  Feed data itself lives in the [`FeedStore`] and only changes
/// through [`App::apply`].
pub struct App {
    store: FeedStore,
    /// Index of the feed whose tab is selected.
    active: usize,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last noteworthy event, shown in the status bar.
    pub status: String,
}

impl App {
    pub fn new(store: FeedStore) -> Self {
        Self {
            store,
            active: 0,
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
        }
    }

    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_feed(&self) -> Option<&FeedState> {
        self.store.feeds().get(self.active)
    }

    pub fn connection(&self) -> ConnectionState {
        self.store.connection()
    }

    /// Initial requests: page 1 of every feed.
    pub fn start(&mut self) -> Vec<Effect> {
        let categories: Vec<_> = self
            .store
            .feeds()
            .iter()
            .map(|f| f.category().clone())
            .collect();
        categories
            .into_iter()
            .flat_map(|category| self.apply(Msg::LoadPage { category, page: 1 }))
            .collect()
    }

    /// Feed a message through the store.  Scroll requests are served here;
    /// the remaining effects are returned for the effect runner.
    pub fn apply(&mut self, msg: Msg) -> Vec<Effect> {
        let loaded = match &msg {
            Msg::PageLoaded {
                category,
                result: Err(e),
                ..
            } if self.is_active(category) => {
                self.status = format!("Error: {e}");
                None
            }
            Msg::PageLoaded {
                category,
                result: Ok(_),
                ..
            } => Some(category.clone()),
            Msg::Connection(ConnectionState::Disconnected) => {
                self.status = "Live updates lost, reconnecting".into();
                None
            }
            Msg::Connection(ConnectionState::Connected) => {
                self.status = "Live updates on".into();
                None
            }
            _ => None,
        };

        let mut rest = Vec::new();
        for effect in self.store.update(msg) {
            match effect {
                Effect::ScrollToTop { category } => {
                    if loaded.as_ref() == Some(&category) {
                        self.status = self.page_status(&category);
                    }
                    if self.is_active(&category) {
                        self.scroll_to_top();
                    }
                }
                other => rest.push(other),
            }
        }
        rest
    }

    fn is_active(&self, category: &Category) -> bool {
        self.active_feed().is_some_and(|f| f.category() == category)
    }

    fn page_status(&self, category: &Category) -> String {
        match self.store.feed(category) {
            Some(feed) => format!(
                "{}: page {} of {} ({} items)",
                category.label(),
                feed.page(),
                feed.total_pages(),
                feed.total()
            ),
            None => String::new(),
        }
    }

    fn visible_len(&self) -> usize {
        self.active_feed().map_or(0, |f| f.visible().len())
    }

    fn scroll_to_top(&mut self) {
        let first = (self.visible_len() > 0).then_some(0);
        self.list_state.select(first);
        *self.list_state.offset_mut() = 0;
    }

    // -- pages ---------------------------------------------------------------

    fn load(&mut self, page: u32) -> Vec<Effect> {
        let Some(category) = self.active_feed().map(|f| f.category().clone()) else {
            return Vec::new();
        };
        self.apply(Msg::LoadPage { category, page })
    }

    /// Step forward from the page last asked for, so repeated presses queue
    /// up before the first response lands.
    pub fn next_page(&mut self) -> Vec<Effect> {
        match self.active_feed() {
            Some(feed) if feed.target_page() < feed.total_pages() => {
                let page = feed.target_page() + 1;
                self.load(page)
            }
            _ => Vec::new(),
        }
    }

    pub fn prev_page(&mut self) -> Vec<Effect> {
        match self.active_feed() {
            Some(feed) if feed.target_page() > 1 => {
                let page = feed.target_page() - 1;
                self.load(page)
            }
            _ => Vec::new(),
        }
    }

    /// Re-request the current page; the retry path after a failed load.
    pub fn reload(&mut self) -> Vec<Effect> {
        let page = self.active_feed().map_or(1, |f| f.page());
        self.load(page)
    }

    /// Merge buffered live items, if the banner is showing.
    pub fn merge_pending(&mut self) -> Vec<Effect> {
        let Some(feed) = self.active_feed() else {
            return Vec::new();
        };
        if feed.pending_banner().is_none() {
            return Vec::new();
        }
        let category = feed.category().clone();
        self.apply(Msg::PromotePending { category })
    }

    // -- feeds ---------------------------------------------------------------

    pub fn next_feed(&mut self) {
        let count = self.store.feeds().len();
        if count > 1 {
            self.active = (self.active + 1) % count;
            self.scroll_to_top();
        }
    }

    pub fn prev_feed(&mut self) {
        let count = self.store.feeds().len();
        if count > 1 {
            self.active = (self.active + count - 1) % count;
            self.scroll_to_top();
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.visible_len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.visible_len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }
}
