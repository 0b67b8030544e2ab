//! The article reference shared by the listing endpoint and the push channel.
//!
//! Both sources serialise the same backend row, so a single [`NewsItem`]
//! deserialises from either.  The backend is loose about a few fields (the
//! `id` is an integer in the database, `published` is sometimes ISO 8601 and
//! sometimes Python's `str(datetime)`), and the custom deserialisers below
//! absorb those differences so the rest of the crate sees one shape.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A single published article reference.
///
/// ## Identity
///
/// [`link`](NewsItem::link) is the de-duplication key: two items with the
/// same link (exact, case-sensitive) are the same story, whatever their `id`.
/// An item without a link does not deserialise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsItem {
    /// Opaque backend identifier; only ever used for display.
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,

    /// Canonical URL of the article.
    pub link: String,

    #[serde(default, deserialize_with = "de_null_string")]
    pub title: String,

    /// Display text; may carry light markup (see [`NewsItem::plain_summary`]).
    #[serde(default, deserialize_with = "de_null_string")]
    pub summary: String,

    /// Publisher label.
    #[serde(default, deserialize_with = "de_null_string")]
    pub source: String,

    /// Original publication time.  `None` when missing or unparseable.
    #[serde(default, deserialize_with = "de_published")]
    pub published: Option<DateTime<Utc>>,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewsItem {
    /// Short relative age for list rows: `just now`, `12m`, `3h`, `2d`, or
    /// the calendar date once the item is older than a week.
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let Some(published) = self.published else {
            return "—".into();
        };
        let age = now.signed_duration_since(published);
        if age.num_minutes() < 1 {
            "just now".into()
        } else if age.num_hours() < 1 {
            format!("{}m", age.num_minutes())
        } else if age.num_days() < 1 {
            format!("{}h", age.num_hours())
        } else if age.num_days() < 7 {
            format!("{}d", age.num_days())
        } else {
            published.format("%Y-%m-%d").to_string()
        }
    }

    /// The summary with HTML tags and `**` emphasis markers removed.
    pub fn plain_summary(&self) -> String {
        let mut out = String::with_capacity(self.summary.len());
        let mut in_tag = false;
        for c in self.summary.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if !in_tag => out.push(c),
                _ => {}
            }
        }
        out.replace("**", "").trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    }))
}

fn de_null_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_published<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(|raw| parse_published(&raw)))
}

/// Parse the timestamp formats the backend emits.  Naive values are UTC.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
