use crate::news::PAGE_SIZE;

use super::FeedState;

impl FeedState {
    /// Move every buffered item to the head of the page.
    ///
    /// `visible` becomes `pending ++ visible` cut to [`PAGE_SIZE`], `pending`
    /// empties and the feed is back on page 1.  Any page load still in flight
    /// is superseded, since its page is no longer the one being shown.
    /// Returns `false` (and changes nothing) when the buffer is empty.
    pub fn promote_pending(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }

        let mut merged: Vec<_> = self.pending.drain(..).collect();
        merged.append(&mut self.visible);
        merged.truncate(PAGE_SIZE);

        self.visible = merged;
        self.page = 1;
        self.supersede_load();
        self.reindex();
        true
    }
}
