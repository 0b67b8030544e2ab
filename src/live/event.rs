//! Decoding push frames.
//!
//! Frames are JSON objects `{ "type": "...", "data": { ...NewsItem } }`.
//! The `type` tag picks the feed; tags nobody registered are skipped so the
//! server can add event kinds without breaking older clients.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::news::{Category, NewsItem};

#[derive(Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Maps push tags to the feeds they belong to.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<(String, Category)>,
}

impl Router {
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Self {
        Self {
            routes: categories
                .into_iter()
                .map(|c| (c.push_tag(), c.clone()))
                .collect(),
        }
    }

    /// Decode one text frame.  `None` for anything that is not a new item
    /// for a known feed.
    pub fn route(&self, text: &str) -> Option<(Category, NewsItem)> {
        let frame: Frame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "undecodable push frame");
                return None;
            }
        };
        let Some((_, category)) = self.routes.iter().find(|(tag, _)| *tag == frame.kind) else {
            debug!(kind = %frame.kind, "push frame with unhandled type");
            return None;
        };
        match serde_json::from_value::<NewsItem>(frame.data) {
            Ok(item) => Some((category.clone(), item)),
            Err(e) => {
                warn!(kind = %frame.kind, error = %e, "push frame with malformed item");
                None
            }
        }
    }
}
