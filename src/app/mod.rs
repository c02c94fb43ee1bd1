mod errors;

pub use errors::AppError;

use std::time::Duration;

use chrono::Local;
use reqwest::Client;
use tracing::{info, warn};

use errors::{gemini_setup_error, monitor_to_app_error, no_keywords};

use crate::cli::{Args, parse_keywords};
use crate::gemini::GeminiClient;
use crate::monitor::{self, MonitorRequest};
use crate::news::{AnySource, NewsSource, TimeRange};
use crate::report;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum redirect hops before aborting.
const MAX_REDIRECTS: usize = 5;

/// Runs one monitoring pass: search, summarize, print the table, write the workbook.
pub async fn execute(args: Args) -> Result<(), AppError> {
    let labels = args.lang.labels();

    let keywords = parse_keywords(&args.keywords);
    if keywords.is_empty() {
        return Err(no_keywords(labels));
    }

    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()?;

    let gemini = if args.no_summary {
        None
    } else {
        let client = GeminiClient::from_env(http.clone())
            .map_err(|e| gemini_setup_error(e, labels))?;
        info!(model = client.model(), "summaries enabled");
        Some(client)
    };

    let source = AnySource::new(args.source, http);
    info!(
        source = source.name(),
        keywords = keywords.len(),
        days = args.days,
        "starting monitor run"
    );
    eprintln!("{}", labels.processing);

    let req = MonitorRequest {
        keywords: &keywords,
        range: TimeRange::new(args.days),
        limit: usize::from(args.max_per_keyword),
        lang: args.lang,
        context: &args.context,
        concurrency: usize::from(args.concurrency),
        dedupe: !args.keep_duplicates,
        sort_by_date: !args.keep_feed_order,
        keyword_pause: monitor::pipeline::KEYWORD_PAUSE,
    };
    let report = monitor::run(&source, gemini.as_ref(), &req)
        .await
        .map_err(|e| monitor_to_app_error(e, labels))?;

    for failed in &report.failed_keywords {
        eprintln!("! {}: {}", failed.keyword, failed.reason);
    }

    info!(
        items = report.items.len(),
        duplicates = report.duplicates_removed,
        summarized = report.summarized,
        summary_failures = report.summary_failures,
        "monitor run complete"
    );

    if report.items.is_empty() {
        eprintln!("{}", labels.no_results);
        return Ok(());
    }

    println!("{}", report::format_table(&report.items, labels));
    eprintln!("{}", labels.success);

    if report.summary_failures > 0 {
        warn!(
            failures = report.summary_failures,
            "some summaries could not be generated"
        );
    }

    if !args.no_export {
        let path = args.output_path(Local::now().date_naive());
        report::write_workbook(&path, &report.items, labels)?;
        eprintln!("{}: {}", labels.saved, path.display());
    }

    Ok(())
}
