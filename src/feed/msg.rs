use crate::live::ConnectionState;
use crate::news::{Category, NewsItem, NewsPage};

use super::PageTicket;

/// Everything that can change a [`FeedStore`](super::FeedStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Reader navigated to a page (or asked for a reload).
    LoadPage { category: Category, page: u32 },
    /// A page request finished, successfully or not.
    PageLoaded {
        category: Category,
        ticket: PageTicket,
        result: Result<NewsPage, String>,
    },
    /// The push channel delivered a new item for a feed.
    LiveItem { category: Category, item: NewsItem },
    /// The push channel changed state.
    Connection(ConnectionState),
    /// Reader asked to merge the buffered items.
    PromotePending { category: Category },
}

/// Work the store asks its surroundings to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Request `page` of `category`; report back with the same ticket.
    FetchPage {
        category: Category,
        page: u32,
        ticket: PageTicket,
    },
    /// The page of `category` changed under the reader; scroll to the top.
    ScrollToTop { category: Category },
}
