use crate::gemini::GeminiError;
use crate::locale::Labels;
use crate::monitor::MonitorError;
use crate::news::NewsError;
use crate::report::ReportError;

/// Failures surfaced to the user, with localized wording where the form had one.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    Summarizer(String),

    #[error("{0}")]
    Feed(String),

    #[error("could not create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("could not write report: {0}")]
    Report(#[from] ReportError),
}

pub(super) fn no_keywords(labels: &Labels) -> AppError {
    AppError::Input(labels.error_no_keyword.to_string())
}

pub(super) fn gemini_setup_error(e: GeminiError, labels: &Labels) -> AppError {
    match &e {
        GeminiError::ApiKeyNotSet => AppError::Input(format!(
            "{} ({e}; or pass --no-summary)",
            labels.error_api
        )),
        _ => AppError::Summarizer(e.to_string()),
    }
}

pub(super) fn monitor_to_app_error(e: MonitorError, labels: &Labels) -> AppError {
    match e {
        MonitorError::NoKeywords => no_keywords(labels),
        MonitorError::News(news) => feed_error(news),
    }
}

fn feed_error(e: NewsError) -> AppError {
    match &e {
        NewsError::Status(429) | NewsError::Status(403) | NewsError::MissingToken => {
            AppError::Feed(format!(
                "{e} (the feed may be throttling requests; retry later or try another --source)"
            ))
        }
        _ => AppError::Feed(e.to_string()),
    }
}
