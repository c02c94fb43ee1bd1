use crate::locale::Lang;
use crate::news::NewsItem;

pub(super) const WORD_LIMIT: u32 = 50;

pub(super) fn build_prompt(item: &NewsItem, lang: Lang, context: &str) -> String {
    let snippet = if item.snippet.is_empty() {
        "(none)"
    } else {
        item.snippet.as_str()
    };
    let source = if item.source.is_empty() {
        "(unknown)"
    } else {
        item.source.as_str()
    };

    format!(
        "Task: Summarize the following news item related to {context} in a single line for a corporate PR report.\n\
         Target Language: {}\n\
         Limit: Within {WORD_LIMIT} words. Reply with the summary only, no preamble.\n\
         \n\
         News Title: {}\n\
         News Source: {source}\n\
         News Snippet: {snippet}\n",
        lang.target_language(),
        item.title,
    )
}

/// Collapses model output to one line and drops wrapping quotes.
pub(super) fn one_line(text: &str) -> String {
    let collapsed = crate::news::snippet::collapse_whitespace(text);
    let trimmed = collapsed
        .trim_matches(|c| c == '"' || c == '“' || c == '”')
        .trim();
    trimmed.to_string()
}
