//! News data and the listing endpoint.
//!
//! This module defines the [`NewsItem`] wire type, the [`Category`] that
//! names a feed, and the [`NewsApi`] trait through which pages of the
//! archive are requested.  The only production implementation is
//! [`HttpNewsApi`]; tests substitute their own.

mod http;
mod item;

pub use http::{FetchError, HttpNewsApi};
pub use item::NewsItem;

#[cfg(test)]
pub(crate) use item::tests::make_item;

use async_trait::async_trait;
use serde::Deserialize;

/// Number of items per page.  The client always asks for exactly this many.
pub const PAGE_SIZE: usize = 20;

/// One logical news stream with its own pagination and live buffer.
///
/// The primary feed uses the unprefixed endpoint and push tag
/// (`/api/news`, `new_news`); every other feed is namespaced by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    slug: String,
    primary: bool,
}

impl Category {
    pub fn primary(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            primary: true,
        }
    }

    pub fn secondary(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            primary: false,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Tab label: the slug with its first letter capitalised.
    pub fn label(&self) -> String {
        let mut chars = self.slug.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Path of the listing endpoint, relative to the API base.
    pub fn listing_path(&self) -> String {
        if self.primary {
            "api/news".into()
        } else {
            format!("api/{}/news", self.slug)
        }
    }

    /// The push-event `type` that carries new items for this feed.
    pub fn push_tag(&self) -> String {
        if self.primary {
            "new_news".into()
        } else {
            format!("new_{}_news", self.slug)
        }
    }
}

/// One page of the archive as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsPage {
    pub items: Vec<NewsItem>,
    pub total: u64,
    /// Echo of the requested page; older servers omit it.
    #[serde(default)]
    pub page: Option<u32>,
}

/// Source of archive pages.
///
/// Called from a background task, so implementations must be `Send + Sync`.
#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn fetch_page(&self, category: &Category, page: u32) -> Result<NewsPage, FetchError>;
}
