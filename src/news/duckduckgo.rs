use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::download::download;
use super::snippet::to_plain_text;
use super::{NewsError, NewsItem, NewsSource, TimeRange, finalize};

const BASE_URL: &str = "https://duckduckgo.com";
const REGION: &str = "wt-wt";
const SAFE_SEARCH_OFF: &str = "-2";

/// DuckDuckGo news search. Each query needs a `vqd` token scraped from the HTML search page.
pub struct DuckDuckGoNews {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<NewsResult>,
}

#[derive(Debug, Deserialize)]
struct NewsResult {
    date: Option<i64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    excerpt: String,
}

impl From<NewsResult> for NewsItem {
    fn from(r: NewsResult) -> Self {
        NewsItem {
            keyword: String::new(),
            title: to_plain_text(&r.title),
            link: r.url.trim().to_string(),
            published: r.date.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            source: r.source.trim().to_string(),
            snippet: to_plain_text(&r.excerpt),
            summary: None,
        }
    }
}

impl DuckDuckGoNews {
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

    async fn fetch_token(&self, keyword: &str) -> Result<String, NewsError> {
        let url = url::Url::parse_with_params(&format!("{}/", self.base_url), &[("q", keyword)])?;
        let html = download(&self.http, url.as_str()).await?;
        extract_vqd(&html).ok_or(NewsError::MissingToken)
    }
}

/// DuckDuckGo's time filter: d (day), w (week), m (month).
fn time_filter(range: TimeRange) -> &'static str {
    match range.days {
        1 => "d",
        2..=7 => "w",
        _ => "m",
    }
}

fn extract_vqd(html: &str) -> Option<String> {
    for (prefix, terminators) in [
        ("vqd=\"", &['"'][..]),
        ("vqd='", &['\''][..]),
        ("vqd=", &['&', '"', '\'', ' ', ';', ','][..]),
    ] {
        if let Some(start) = html.find(prefix) {
            let rest = &html[start + prefix.len()..];
            let token: String = rest.chars().take_while(|c| !terminators.contains(c)).collect();
            if !token.is_empty() {
                return Some(token);
            }
        }
    }
    None
}

impl NewsSource for DuckDuckGoNews {
    fn name(&self) -> &'static str {
        "DuckDuckGo News"
    }

    async fn search(
        &self,
        keyword: &str,
        range: TimeRange,
        limit: usize,
    ) -> Result<Vec<NewsItem>, NewsError> {
        let vqd = self.fetch_token(keyword).await?;
        let url = url::Url::parse_with_params(
            &format!("{}/news.js", self.base_url),
            &[
                ("l", REGION),
                ("o", "json"),
                ("noamp", "1"),
                ("q", keyword),
                ("vqd", vqd.as_str()),
                ("p", SAFE_SEARCH_OFF),
                ("df", time_filter(range)),
            ],
        )?;
        let body = download(&self.http, url.as_str()).await?;
        let response: NewsResponse = serde_json::from_str(&body)?;
        let items: Vec<NewsItem> = response
            .results
            .into_iter()
            .map(NewsItem::from)
            .filter(|item| !item.link.is_empty())
            .collect();
        debug!(keyword, found = items.len(), "duckduckgo news results");
        Ok(finalize(items, keyword, range, limit, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn extracts_double_quoted_token() {
        let html = r#"<script>DDG.deep.initialize('/d.js?q=x', vqd="4-123456789012345678901234567890");</script>"#;
        assert_eq!(
            extract_vqd(html).as_deref(),
            Some("4-123456789012345678901234567890")
        );
    }

    #[test]
    fn extracts_query_string_token() {
        let html = "<a href=\"/d.js?q=x&vqd=4-98765&kl=wt-wt\">";
        assert_eq!(extract_vqd(html).as_deref(), Some("4-98765"));
    }

    #[test]
    fn missing_token_is_none() {
        assert!(extract_vqd("<html>no token here</html>").is_none());
    }

    #[test]
    fn time_filter_buckets() {
        assert_eq!(time_filter(TimeRange::new(1)), "d");
        assert_eq!(time_filter(TimeRange::new(5)), "w");
        assert_eq!(time_filter(TimeRange::new(14)), "m");
    }

    #[tokio::test]
    async fn search_uses_token_and_maps_results() {
        let now = Utc::now().timestamp();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "Foxconn"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"<html>vqd="4-abc"</html>"#),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/news.js"))
            .and(query_param("vqd", "4-abc"))
            .and(query_param("df", "w"))
            .and(query_param("l", "wt-wt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {
                        "date": now,
                        "title": "Foxconn &amp; Nvidia team up",
                        "url": "https://example.com/ai",
                        "source": "Reuters",
                        "excerpt": "<b>Foxconn</b> will build AI servers"
                    },
                    {
                        "date": now,
                        "title": "No url",
                        "source": "Nowhere"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let ddg = DuckDuckGoNews::with_base_url(Client::new(), &server.uri());
        let items = ddg.search("Foxconn", TimeRange::new(7), 5).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Foxconn & Nvidia team up");
        assert_eq!(items[0].snippet, "Foxconn will build AI servers");
        assert_eq!(items[0].keyword, "Foxconn");
        assert!(items[0].published.is_some());
    }

    #[tokio::test]
    async fn search_without_token_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let ddg = DuckDuckGoNews::with_base_url(Client::new(), &server.uri());
        let result = ddg.search("Foxconn", TimeRange::new(1), 5).await;
        assert!(matches!(result, Err(NewsError::MissingToken)));
    }
}
