use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::prompt::{build_prompt, one_line};
use super::summary::SummaryFailure;
use crate::gemini::TextGenerator;
use crate::locale::Lang;
use crate::news::{NewsError, NewsItem, NewsSource, TimeRange};

pub const KEYWORD_PAUSE: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct MonitorRequest<'a> {
    pub keywords: &'a [String],
    pub range: TimeRange,
    pub limit: usize,
    pub lang: Lang,
    pub context: &'a str,
    pub concurrency: usize,
    pub dedupe: bool,
    pub sort_by_date: bool,
    pub keyword_pause: Duration,
}

#[derive(Debug)]
pub struct MonitorReport {
    pub items: Vec<NewsItem>,
    pub failed_keywords: Vec<FailedKeyword>,
    pub duplicates_removed: usize,
    pub summarized: usize,
    pub summary_failures: usize,
}

#[derive(Debug)]
pub struct FailedKeyword {
    pub keyword: String,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("no keywords to search")]
    NoKeywords,

    #[error("{0}")]
    News(#[from] NewsError),
}

pub async fn run(
    source: &impl NewsSource,
    summarizer: Option<&impl TextGenerator>,
    req: &MonitorRequest<'_>,
) -> Result<MonitorReport, MonitorError> {
    let (mut items, failed_keywords) =
        collect(source, req.keywords, req.range, req.limit, req.keyword_pause).await?;

    let duplicates_removed = if req.dedupe {
        let before = items.len();
        items = dedupe_by_link(items);
        before - items.len()
    } else {
        0
    };

    let (summarized, summary_failures) = match summarizer {
        Some(generator) => {
            summarize_all(generator, &mut items, req.lang, req.context, req.concurrency).await
        }
        None => (0, 0),
    };

    if req.sort_by_date {
        sort_by_date(&mut items);
    }

    Ok(MonitorReport {
        items,
        failed_keywords,
        duplicates_removed,
        summarized,
        summary_failures,
    })
}

/// Queries the source once per keyword, in input order. Fails only when every keyword fails.
async fn collect(
    source: &impl NewsSource,
    keywords: &[String],
    range: TimeRange,
    limit: usize,
    pause: Duration,
) -> Result<(Vec<NewsItem>, Vec<FailedKeyword>), MonitorError> {
    if keywords.is_empty() {
        return Err(MonitorError::NoKeywords);
    }

    let mut items = Vec::new();
    let mut failed = Vec::new();
    let mut first_err = None;

    for (i, keyword) in keywords.iter().enumerate() {
        if i > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        match source.search(keyword, range, limit).await {
            Ok(found) => {
                info!(keyword = %keyword, source = source.name(), found = found.len(), "keyword searched");
                items.extend(found);
            }
            Err(e) => {
                warn!(keyword = %keyword, error = %e, "keyword search failed (continuing with other keywords)");
                failed.push(FailedKeyword {
                    keyword: keyword.clone(),
                    reason: e.to_string(),
                });
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }

    if failed.len() == keywords.len()
        && let Some(e) = first_err
    {
        return Err(e.into());
    }

    Ok((items, failed))
}

fn link_key(link: &str) -> &str {
    link.trim().trim_end_matches('/')
}

/// Keeps the first item per link.
pub(crate) fn dedupe_by_link(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(link_key(&item.link).to_string()))
        .collect()
}

/// Newest first; undated items keep their relative order at the end.
pub(crate) fn sort_by_date(items: &mut [NewsItem]) {
    items.sort_by(|a, b| match (a.published, b.published) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Attaches a summary to every item. Requests go out in item order with at most
/// `concurrency` in flight. Returns (summarized, failed).
async fn summarize_all(
    generator: &impl TextGenerator,
    items: &mut [NewsItem],
    lang: Lang,
    context: &str,
    concurrency: usize,
) -> (usize, usize) {
    let total = items.len();
    let aborted: Cell<Option<SummaryFailure>> = Cell::new(None);
    let done = Cell::new(0usize);

    let outcomes: Vec<Result<String, SummaryFailure>> = stream::iter(items.iter())
        .map(|item| {
            let prompt = build_prompt(item, lang, context);
            let aborted = &aborted;
            let done = &done;
            async move {
                if let Some(failure) = aborted.get() {
                    return Err(failure);
                }
                let outcome = match generator.generate(&prompt).await {
                    Ok(text) => {
                        let line = one_line(&text);
                        if line.is_empty() {
                            warn!(link = %item.link, "summary empty after cleanup");
                            Err(SummaryFailure::Filtered)
                        } else {
                            Ok(line)
                        }
                    }
                    Err(e) => {
                        warn!(link = %item.link, error = %e, "summary failed");
                        let failure = SummaryFailure::from(&e);
                        if e.is_fatal_for_run() {
                            warn!("skipping remaining summaries");
                            aborted.set(Some(failure));
                        }
                        Err(failure)
                    }
                };
                done.set(done.get() + 1);
                debug!(done = done.get(), total, "summary progress");
                outcome
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut summarized = 0;
    let mut failed = 0;
    for (item, outcome) in items.iter_mut().zip(outcomes) {
        item.summary = Some(match outcome {
            Ok(text) => {
                summarized += 1;
                text
            }
            Err(failure) => {
                failed += 1;
                failure.wording().to_string()
            }
        });
    }

    info!(summarized, failed, total, "summaries complete");
    (summarized, failed)
}
