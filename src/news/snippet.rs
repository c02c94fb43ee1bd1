use quick_xml::escape::{resolve_html5_entity, unescape_with};

/// Reduces feed HTML (`<a>`, `<b>`, `<font>`, entities) to single-line plain text.
pub(crate) fn to_plain_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => text.push(c),
        }
    }

    // HTML entity names plus numeric references; text with a stray `&` stays as is.
    let decoded = unescape_with(&text, resolve_html5_entity)
        .map(|s| s.into_owned())
        .ok();

    collapse_whitespace(decoded.as_deref().unwrap_or(&text))
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_spaces() {
        let html = r##"<a href="https://x.com/a">Foxconn expands</a>&nbsp;&nbsp;<font color="#6f6f6f">Reuters</font>"##;
        assert_eq!(to_plain_text(html), "Foxconn expands Reuters");
    }

    #[test]
    fn decodes_xml_entities() {
        assert_eq!(to_plain_text("AT&amp;T &lt;b&gt; deal"), "AT&T <b> deal");
    }

    #[test]
    fn decodes_numeric_and_html_named_entities() {
        assert_eq!(
            to_plain_text("Foxconn&#8217;s plan&nbsp;<font>Reuters</font>"),
            "Foxconn\u{2019}s plan Reuters"
        );
        assert_eq!(to_plain_text("Apple&#x27;s &mdash; iPhone"), "Apple's \u{2014} iPhone");
    }

    #[test]
    fn stray_ampersand_keeps_text() {
        assert_eq!(to_plain_text("AT&T deal &amp more"), "AT&T deal &amp more");
    }

    #[test]
    fn highlights_are_removed() {
        assert_eq!(
            to_plain_text("<b>Foxconn</b> posts record revenue"),
            "Foxconn posts record revenue"
        );
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(to_plain_text("already plain"), "already plain");
    }

    #[test]
    fn newlines_become_spaces() {
        assert_eq!(collapse_whitespace("line1\n\nline2\r\n line3"), "line1 line2 line3");
    }
}
