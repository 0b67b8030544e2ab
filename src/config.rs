//! Command-line configuration.
//!
//! Only the API base address is needed; the push channel address is derived
//! from it the way a browser client derives it from the page's own origin
//! (`http` → `ws`, `https` → `wss`), unless given explicitly.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, ValueEnum};
use url::Url;

use crate::live::Backoff;
use crate::news::Category;

#[derive(Debug, Parser)]
#[command(name = "livefeed", version, about = "Live-updating news reader for the terminal")]
pub struct Args {
    /// Base address of the news API.
    #[arg(long, env = "LIVEFEED_API", default_value = "http://localhost:8000/")]
    pub api_base: Url,

    /// Push channel address.  Derived from --api-base when omitted.
    #[arg(long, env = "LIVEFEED_WS")]
    pub ws_url: Option<Url>,

    /// Slug of the primary feed (served at /api/news, tagged `new_news`).
    #[arg(long, default_value = "world")]
    pub primary: String,

    /// Additional feed, served at /api/<SLUG>/news.  Repeatable.
    #[arg(long = "feed", value_name = "SLUG")]
    pub feeds: Vec<String>,

    /// Reconnection delay policy for the push channel.
    #[arg(long, value_enum, default_value_t = BackoffKind::Fixed)]
    pub backoff: BackoffKind,

    /// Give up on a push channel connect attempt after this many seconds.
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub connect_timeout: u64,

    /// Where to write the log.  The terminal itself belongs to the UI.
    #[arg(long, default_value = "livefeed.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackoffKind {
    /// Retry every 5 seconds.
    Fixed,
    /// Capped exponential delay with jitter.
    Exponential,
}

impl Args {
    /// Primary feed first, then the extra feeds in the order given.
    pub fn categories(&self) -> Vec<Category> {
        std::iter::once(Category::primary(&self.primary))
            .chain(
                self.feeds
                    .iter()
                    .filter(|slug| **slug != self.primary)
                    .map(Category::secondary),
            )
            .collect()
    }

    pub fn push_url(&self) -> Result<Url> {
        match &self.ws_url {
            Some(url) => Ok(url.clone()),
            None => derive_push_url(&self.api_base),
        }
    }

    pub fn backoff(&self) -> Backoff {
        match self.backoff {
            BackoffKind::Fixed => Backoff::default(),
            BackoffKind::Exponential => Backoff::exponential(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout.max(1))
    }
}

/// `http://host/app` → `ws://host/app/ws`.
pub fn derive_push_url(api_base: &Url) -> Result<Url> {
    let scheme = match api_base.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => bail!("cannot derive a push channel address from a {other}:// API base"),
    };
    let mut url = api_base.clone();
    url.set_scheme(scheme)
        .map_err(|()| anyhow!("cannot switch {api_base} to {scheme}://"))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    let mut url = url.join("ws")?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("livefeed").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_point_at_localhost() {
        let args = parse(&[]);
        assert_eq!(args.api_base.as_str(), "http://localhost:8000/");
        assert_eq!(args.push_url().unwrap().as_str(), "ws://localhost:8000/ws");
        assert_eq!(args.backoff(), Backoff::default());
        assert_eq!(args.connect_timeout(), Duration::from_secs(10));
        assert_eq!(args.categories(), vec![Category::primary("world")]);
    }

    #[test]
    fn extra_feeds_follow_the_primary() {
        let args = parse(&["--feed", "yemen", "--feed", "world", "--feed", "sport"]);
        assert_eq!(
            args.categories(),
            vec![
                Category::primary("world"),
                Category::secondary("yemen"),
                Category::secondary("sport"),
            ]
        );
    }

    #[test]
    fn explicit_ws_url_wins() {
        let args = parse(&["--ws-url", "wss://push.example.com/stream"]);
        assert_eq!(
            args.push_url().unwrap().as_str(),
            "wss://push.example.com/stream"
        );
    }

    #[test]
    fn exponential_backoff_is_selectable() {
        let args = parse(&["--backoff", "exponential"]);
        assert_eq!(args.backoff(), Backoff::exponential());
    }

    #[test]
    fn connect_timeout_is_at_least_a_second() {
        assert_eq!(parse(&["--connect-timeout", "3"]).connect_timeout(), Duration::from_secs(3));
        assert_eq!(parse(&["--connect-timeout", "0"]).connect_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn push_url_follows_scheme_and_path() {
        let https = Url::parse("https://news.example.com/app?x=1").unwrap();
        assert_eq!(
            derive_push_url(&https).unwrap().as_str(),
            "wss://news.example.com/app/ws"
        );

        let ftp = Url::parse("ftp://news.example.com/").unwrap();
        assert!(derive_push_url(&ftp).is_err());
    }
}
