use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;

use super::snippet::{collapse_whitespace, to_plain_text};
use super::{NewsError, NewsItem};

#[derive(Default)]
struct ItemFields {
    title: String,
    link: String,
    pub_date: String,
    source: String,
    description: String,
}

impl ItemFields {
    fn append(&mut self, tag: &str, text: &str) {
        let field = match tag {
            "title" => &mut self.title,
            "link" => &mut self.link,
            "pubdate" => &mut self.pub_date,
            "source" => &mut self.source,
            "description" => &mut self.description,
            _ => return,
        };
        field.push_str(text);
    }

    fn into_item(self) -> Option<NewsItem> {
        let link = self.link.trim().to_string();
        if link.is_empty() {
            return None;
        }
        Some(NewsItem {
            keyword: String::new(),
            title: collapse_whitespace(&self.title),
            link,
            published: parse_rfc2822(&self.pub_date),
            source: collapse_whitespace(&self.source),
            snippet: to_plain_text(&self.description),
            summary: None,
        })
    }
}

/// Parses RSS 2.0 `<item>` elements in document order. Items without a link are skipped.
pub(crate) fn parse_rss(xml: &str) -> Result<Vec<NewsItem>, NewsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<ItemFields> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(e.name().as_ref());
                if name == "item" {
                    current = Some(ItemFields::default());
                    current_tag.clear();
                } else {
                    current_tag = name;
                }
            }
            Ok(Event::End(e)) => {
                let name = element_name(e.name().as_ref());
                if name == "item" {
                    if let Some(item) = current.take().and_then(ItemFields::into_item) {
                        items.push(item);
                    }
                } else {
                    current_tag.clear();
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(fields) = current.as_mut() {
                    let text = e.unescape().map_err(|e| NewsError::Xml(e.to_string()))?;
                    fields.append(&current_tag, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(fields) = current.as_mut() {
                    fields.append(&current_tag, &String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(NewsError::Xml(format!(
                    "at byte {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    Ok(items)
}

/// Lowercased element name. Prefixed elements (`media:title`, ...) map to an empty
/// name so they never feed item fields; Bing's `News:Source` is the one exception.
fn element_name(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw).to_ascii_lowercase();
    if !name.contains(':') {
        return name;
    }
    match name.as_str() {
        "news:source" => "source".to_string(),
        _ => String::new(),
    }
}

fn parse_rfc2822(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const GOOGLE_RSS: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>"Foxconn" - Google News</title>
    <link>https://news.google.com/search?q=Foxconn</link>
    <item>
      <title>Foxconn posts record quarterly revenue - Reuters</title>
      <link>https://news.google.com/rss/articles/abc?oc=5</link>
      <guid isPermaLink="false">abc</guid>
      <pubDate>Tue, 10 Mar 2026 08:00:00 GMT</pubDate>
      <description>&lt;a href="https://news.google.com/rss/articles/abc"&gt;Foxconn posts record quarterly revenue&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Reuters&lt;/font&gt;</description>
      <source url="https://www.reuters.com">Reuters</source>
    </item>
    <item>
      <title><![CDATA[Hon Hai & partners unveil EV platform]]></title>
      <link>https://news.google.com/rss/articles/def?oc=5</link>
      <pubDate>not a date</pubDate>
      <source url="https://www.bloomberg.com">Bloomberg</source>
    </item>
    <item>
      <title>Item without link</title>
    </item>
  </channel>
</rss>"##;

    #[test]
    fn parses_items_in_order() {
        let items = parse_rss(GOOGLE_RSS).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Foxconn posts record quarterly revenue - Reuters");
        assert_eq!(items[0].link, "https://news.google.com/rss/articles/abc?oc=5");
        assert_eq!(items[0].source, "Reuters");
        assert_eq!(
            items[0].published,
            Some(Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap())
        );
        assert_eq!(items[1].title, "Hon Hai & partners unveil EV platform");
    }

    #[test]
    fn description_html_becomes_plain_text() {
        let items = parse_rss(GOOGLE_RSS).unwrap();
        assert_eq!(
            items[0].snippet,
            "Foxconn posts record quarterly revenue Reuters"
        );
    }

    #[test]
    fn unparseable_date_is_none() {
        let items = parse_rss(GOOGLE_RSS).unwrap();
        assert!(items[1].published.is_none());
    }

    #[test]
    fn channel_link_is_not_an_item() {
        let items = parse_rss(GOOGLE_RSS).unwrap();
        assert!(items.iter().all(|i| !i.link.contains("search?q=")));
    }

    #[test]
    fn namespaced_source_element_is_read() {
        let xml = r#"<rss xmlns:News="https://www.bing.com/news/search"><channel>
            <item>
              <title>Title</title>
              <link>https://example.com/story</link>
              <News:Source>Nikkei Asia</News:Source>
            </item>
        </channel></rss>"#;

        let items = parse_rss(xml).unwrap();
        assert_eq!(items[0].source, "Nikkei Asia");
    }

    #[test]
    fn prefixed_media_elements_do_not_leak_into_fields() {
        let xml = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel>
            <item>
              <title>Foxconn ships servers</title>
              <media:title>Thumbnail caption</media:title>
              <link>https://example.com/servers</link>
              <description>Shipments rose.</description>
              <media:description>Photo credit</media:description>
            </item>
        </channel></rss>"#;

        let items = parse_rss(xml).unwrap();

        assert_eq!(items[0].title, "Foxconn ships servers");
        assert_eq!(items[0].snippet, "Shipments rose.");
    }

    #[test]
    fn element_names_keep_only_unprefixed_and_bing_source() {
        assert_eq!(element_name(b"Title"), "title");
        assert_eq!(element_name(b"News:Source"), "source");
        assert_eq!(element_name(b"media:title"), "");
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let result = parse_rss("<rss><channel><item><title>x</link></item>");
        assert!(matches!(result, Err(NewsError::Xml(_))));
    }

    #[test]
    fn empty_channel_yields_no_items() {
        let items = parse_rss("<rss><channel><title>empty</title></channel></rss>").unwrap();
        assert!(items.is_empty());
    }
}
