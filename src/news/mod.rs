//! News feed sources: Google News RSS, Bing News RSS, and DuckDuckGo news.

pub(crate) mod bing;
pub(crate) mod download;
pub(crate) mod duckduckgo;
pub(crate) mod google;
pub(crate) mod rss;
pub(crate) mod snippet;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;

pub use bing::BingNews;
pub use duckduckgo::DuckDuckGoNews;
pub use google::GoogleNews;

/// One headline as it flows through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub keyword: String,
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub source: String,
    pub snippet: String,
    pub summary: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("feed request failed: status {0}")]
    Status(u16),

    #[error("feed response too large (>{} bytes)", download::MAX_RESPONSE_BYTES)]
    TooLarge,

    #[error("malformed feed XML: {0}")]
    Xml(String),

    #[error("malformed feed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("search token not found in DuckDuckGo response")]
    MissingToken,
}

/// Look-back window in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub days: u32,
}

impl TimeRange {
    pub fn new(days: u32) -> Self {
        Self { days: days.max(1) }
    }

    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.days))
    }

    /// Undated items are kept; the feed already scoped them.
    pub fn contains(self, published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        published.is_none_or(|at| at >= self.cutoff(now))
    }
}

/// A keyword news search backend.
/// Implemented per feed for production; mock implementations used in tests.
pub trait NewsSource {
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        keyword: &str,
        range: TimeRange,
        limit: usize,
    ) -> Result<Vec<NewsItem>, NewsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SourceKind {
    #[default]
    Google,
    Bing,
    #[value(name = "duckduckgo")]
    DuckDuckGo,
}

/// Runtime-selected feed, dispatching to the concrete source.
pub enum AnySource {
    Google(GoogleNews),
    Bing(BingNews),
    DuckDuckGo(DuckDuckGoNews),
}

impl AnySource {
    pub fn new(kind: SourceKind, http: Client) -> Self {
        match kind {
            SourceKind::Google => AnySource::Google(GoogleNews::new(http)),
            SourceKind::Bing => AnySource::Bing(BingNews::new(http)),
            SourceKind::DuckDuckGo => AnySource::DuckDuckGo(DuckDuckGoNews::new(http)),
        }
    }
}

impl NewsSource for AnySource {
    fn name(&self) -> &'static str {
        match self {
            AnySource::Google(s) => s.name(),
            AnySource::Bing(s) => s.name(),
            AnySource::DuckDuckGo(s) => s.name(),
        }
    }

    async fn search(
        &self,
        keyword: &str,
        range: TimeRange,
        limit: usize,
    ) -> Result<Vec<NewsItem>, NewsError> {
        match self {
            AnySource::Google(s) => s.search(keyword, range, limit).await,
            AnySource::Bing(s) => s.search(keyword, range, limit).await,
            AnySource::DuckDuckGo(s) => s.search(keyword, range, limit).await,
        }
    }
}

/// Drops items outside the window, tags the keyword, and keeps the first `limit` in feed order.
pub(crate) fn finalize(
    items: Vec<NewsItem>,
    keyword: &str,
    range: TimeRange,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter(|item| range.contains(item.published, now))
        .take(limit)
        .map(|mut item| {
            item.keyword = keyword.to_string();
            item
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_item(link: &str, published: Option<DateTime<Utc>>) -> NewsItem {
    NewsItem {
        keyword: String::new(),
        title: format!("Title for {link}"),
        link: link.to_string(),
        published,
        source: "Example Wire".to_string(),
        snippet: String::new(),
        summary: None,
    }
}
