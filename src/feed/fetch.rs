//! Paginated fetch controller.
//!
//! A page load is split in two halves so the network call can run elsewhere:
//! [`FeedState::begin_load`] raises the loading flag and hands out a
//! [`PageTicket`], and [`FeedState::finish_load`] applies the result only if
//! that ticket still belongs to the most recent request.  Anything older is a
//! stale response and is dropped without touching the feed.

use std::collections::HashSet;

use crate::news::{NewsPage, PAGE_SIZE};

use super::{FeedState, PageTicket};

/// What [`FeedState::finish_load`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page replaced `visible`.
    Applied,
    /// The request failed; the previous page stays on screen.
    Failed,
    /// A newer request superseded this one; ignored.
    Stale,
}

impl FeedState {
    /// Start loading `page` (clamped to 1).  Returns the page actually
    /// requested and the ticket its response must present.
    pub fn begin_load(&mut self, page: u32) -> (u32, PageTicket) {
        let page = page.max(1);
        let ticket = self.issue_ticket();
        self.latest_request = Some((ticket, page));
        self.loading = true;
        (page, ticket)
    }

    /// Apply the response for `ticket`.
    ///
    /// On success the page replaces `visible` outright and `total` and `page`
    /// follow the server.  Moving to another page empties `pending`.  A
    /// reload of the page already shown keeps every buffered item the new
    /// page does not carry, since the listing may predate the push.  On
    /// failure nothing but the loading flag changes.
    pub fn finish_load(
        &mut self,
        ticket: PageTicket,
        result: Result<NewsPage, String>,
    ) -> LoadOutcome {
        let requested = match self.latest_request {
            Some((latest, page)) if latest == ticket => page,
            _ => return LoadOutcome::Stale,
        };
        self.latest_request = None;
        self.loading = false;

        let Ok(listing) = result else {
            return LoadOutcome::Failed;
        };

        let mut seen = HashSet::new();
        self.visible = listing
            .items
            .into_iter()
            .filter(|item| seen.insert(item.link.clone()))
            .take(PAGE_SIZE)
            .collect();
        self.total = listing.total;
        let page = listing.page.unwrap_or(requested).max(1);
        if page == self.page {
            self.pending.retain(|item| !seen.contains(&item.link));
        } else {
            self.pending.clear();
        }
        self.page = page;
        self.reindex();
        LoadOutcome::Applied
    }

    /// Drop interest in whatever request is in flight.
    pub(super) fn supersede_load(&mut self) {
        self.latest_request = None;
        self.loading = false;
    }

    fn issue_ticket(&mut self) -> PageTicket {
        self.next_ticket += 1;
        PageTicket(self.next_ticket)
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(PAGE_SIZE as u64).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// The page the reader is heading to: the one in flight, else the one
    /// shown.
    pub fn target_page(&self) -> u32 {
        self.latest_request.map_or(self.page, |(_, page)| page)
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }
}
