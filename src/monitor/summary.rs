use crate::gemini::GeminiError;

/// Why an item has no generated summary. The wording replaces the summary cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFailure {
    RateLimited,
    QuotaExhausted,
    InvalidApiKey,
    ModelUnavailable,
    Filtered,
    Network,
    Api,
}

impl SummaryFailure {
    pub fn wording(self) -> &'static str {
        match self {
            SummaryFailure::RateLimited => "Summary unavailable: rate limit exceeded",
            SummaryFailure::QuotaExhausted => "Summary unavailable: API quota exhausted",
            SummaryFailure::InvalidApiKey => "Summary unavailable: API key rejected",
            SummaryFailure::ModelUnavailable => "Summary unavailable: model not available",
            SummaryFailure::Filtered => "Summary unavailable: response was empty or filtered",
            SummaryFailure::Network => "Summary unavailable: network error",
            SummaryFailure::Api => "Summary unavailable: AI generation error",
        }
    }
}

impl From<&GeminiError> for SummaryFailure {
    fn from(e: &GeminiError) -> Self {
        match e {
            GeminiError::RateLimited => SummaryFailure::RateLimited,
            GeminiError::QuotaExhausted(_) => SummaryFailure::QuotaExhausted,
            GeminiError::ApiKeyNotSet | GeminiError::InvalidApiKey(_) => {
                SummaryFailure::InvalidApiKey
            }
            GeminiError::ModelNotFound(_) => SummaryFailure::ModelUnavailable,
            GeminiError::EmptyResponse => SummaryFailure::Filtered,
            GeminiError::Network(_) => SummaryFailure::Network,
            GeminiError::Api { .. } => SummaryFailure::Api,
        }
    }
}
