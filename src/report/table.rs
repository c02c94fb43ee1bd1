use super::format_date;
use crate::locale::Labels;
use crate::markdown::{escape_md_link, escape_table_cell};
use crate::news::NewsItem;

/// Markdown table in column order Date, Keyword, Title, AI Summary, Source, Link.
pub fn format_table(items: &[NewsItem], labels: &Labels) -> String {
    let columns = labels.columns();
    let mut output = format!("| {} |\n", columns.join(" | "));
    output.push_str(&format!("|{}\n", "---|".repeat(columns.len())));

    for item in items {
        let link = if item.link.is_empty() {
            String::new()
        } else {
            let url = escape_table_cell(&escape_md_link(&item.link));
            format!("[{}]({url})", labels.col_link)
        };
        let cells = [
            format_date(item),
            escape_table_cell(&item.keyword),
            escape_table_cell(&item.title),
            escape_table_cell(item.summary.as_deref().unwrap_or_default()),
            escape_table_cell(&item.source),
            link,
        ];
        output.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    output
}
