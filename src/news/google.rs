use chrono::Utc;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use tracing::debug;

use super::download::download;
use super::rss::parse_rss;
use super::{NewsError, NewsItem, NewsSource, TimeRange, finalize};

const BASE_URL: &str = "https://news.google.com";
const EDITION: &str = "hl=en-US&gl=US&ceid=US:en";

/// Google News RSS search. The day range is pushed into the query with the `when:` operator.
pub struct GoogleNews {
    http: Client,
    base_url: String,
}

impl GoogleNews {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    fn search_url(&self, keyword: &str, range: TimeRange) -> String {
        let query = format!("{keyword} when:{}d", range.days);
        let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC);
        format!("{}/rss/search?q={encoded}&{EDITION}", self.base_url)
    }
}

impl NewsSource for GoogleNews {
    fn name(&self) -> &'static str {
        "Google News"
    }

    async fn search(
        &self,
        keyword: &str,
        range: TimeRange,
        limit: usize,
    ) -> Result<Vec<NewsItem>, NewsError> {
        let url = self.search_url(keyword, range);
        let body = download(&self.http, &url).await?;
        let mut items = parse_rss(&body)?;
        for item in &mut items {
            strip_publisher_suffix(item);
        }
        debug!(keyword, found = items.len(), "google news results");
        Ok(finalize(items, keyword, range, limit, Utc::now()))
    }
}

/// Google appends " - Publisher" to every headline; the publisher has its own column.
fn strip_publisher_suffix(item: &mut NewsItem) {
    if item.source.is_empty() {
        return;
    }
    let suffix = format!(" - {}", item.source);
    if let Some(stripped) = item.title.strip_suffix(&suffix)
        && !stripped.trim().is_empty()
    {
        item.title = stripped.trim_end().to_string();
    }
}
