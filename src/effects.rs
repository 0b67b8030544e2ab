//! Carries out the store's effects off the UI thread.
//!
//! Page fetches run as tasks on the tokio runtime and report back over the
//! same channel the push loop uses, so the UI thread sees one ordered stream
//! of [`Msg`] values.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::feed::{Effect, Msg, PageTicket};
use crate::news::{Category, NewsApi, NewsPage};

pub struct EffectRunner {
    runtime: Handle,
    api: Arc<dyn NewsApi>,
    tx: UnboundedSender<Msg>,
}

impl EffectRunner {
    pub fn new(runtime: Handle, api: Arc<dyn NewsApi>, tx: UnboundedSender<Msg>) -> Self {
        Self { runtime, api, tx }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage {
                    category,
                    page,
                    ticket,
                } => self.fetch(category, page, ticket),
                // Handled by the app before effects reach the runner.
                Effect::ScrollToTop { .. } => {}
            }
        }
    }

    fn fetch(&self, category: Category, page: u32, ticket: PageTicket) {
        let api = Arc::clone(&self.api);
        let mut completion = Completion {
            reply: Some((self.tx.clone(), category.clone(), ticket)),
        };
        self.runtime.spawn(async move {
            let result = api.fetch_page(&category, page).await.map_err(|e| {
                warn!(feed = category.slug(), page, error = %e, "fetch failed");
                e.to_string()
            });
            completion.finish(result);
        });
    }
}

/// Reports a page request's outcome exactly once.  If the task is dropped
/// before finishing (panic, runtime shutdown), the drop reports a failure so
/// the feed's loading flag still comes down.
struct Completion {
    reply: Option<(UnboundedSender<Msg>, Category, PageTicket)>,
}

impl Completion {
    fn finish(&mut self, result: Result<NewsPage, String>) {
        if let Some((tx, category, ticket)) = self.reply.take() {
            let _ = tx.send(Msg::PageLoaded {
                category,
                ticket,
                result,
            });
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.finish(Err("page request abandoned".into()));
    }
}
