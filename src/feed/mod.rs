//! Client-side feed synchronisation.
//!
//! Reconciles the paginated archive with the unordered stream of live
//! arrivals.  Per feed, a [`FeedState`] holds the page on screen (`visible`)
//! and the arrivals held back from it (`pending`); the [`FeedStore`] owns all
//! feeds and is driven exclusively by [`Msg`] values, answering with
//! [`Effect`]s for the outside world to carry out.
//!
//! ```text
//!  LoadPage ──► begin_load ──► Effect::FetchPage ──► (network) ──► PageLoaded ──► finish_load
//!  LiveItem ──► push_live   (dedup against visible ∪ pending, prepend to pending)
//!  PromotePending ──► promote_pending ──► Effect::ScrollToTop
//! ```

mod dedup;
mod fetch;
mod merge;
mod msg;
mod pending;
mod state;
mod store;

pub use dedup::DedupIndex;
pub use fetch::LoadOutcome;
pub use msg::{Effect, Msg};
pub use state::{FeedState, PageTicket};
pub use store::FeedStore;
