use chrono::Utc;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use tracing::debug;

use super::download::download;
use super::rss::parse_rss;
use super::{NewsError, NewsItem, NewsSource, TimeRange, finalize};

const BASE_URL: &str = "https://www.bing.com";

/// Bing News RSS search.
pub struct BingNews {
    http: Client,
    base_url: String,
}

impl BingNews {
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
        let encoded = utf8_percent_encode(keyword, NON_ALPHANUMERIC);
        let filter = utf8_percent_encode(interval_filter(range), NON_ALPHANUMERIC);
        format!(
            "{}/news/search?q={encoded}&format=rss&mkt=en-US&qft={filter}",
            self.base_url
        )
    }
}

/// Bing only offers fixed windows; the cutoff filter trims the rest locally.
fn interval_filter(range: TimeRange) -> &'static str {
    match range.days {
        1 => "interval=\"7\"",
        2..=7 => "interval=\"8\"",
        _ => "interval=\"9\"",
    }
}

/// Bing links go through `apiclick.aspx`; the article URL is in the `url` parameter.
fn unwrap_redirect(link: &str) -> String {
    let Ok(parsed) = url::Url::parse(link) else {
        return link.to_string();
    };
    if !parsed.path().ends_with("/apiclick.aspx") {
        return link.to_string();
    }
    parsed
        .query_pairs()
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned())
        .filter(|v| v.starts_with("http://") || v.starts_with("https://"))
        .unwrap_or_else(|| link.to_string())
}

impl NewsSource for BingNews {
    fn name(&self) -> &'static str {
        "Bing News"
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
            item.link = unwrap_redirect(&item.link);
        }
        debug!(keyword, found = items.len(), "bing news results");
        Ok(finalize(items, keyword, range, limit, Utc::now()))
    }
}
