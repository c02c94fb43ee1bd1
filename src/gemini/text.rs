use tracing::warn;

use super::types::GenerateContentResponse;

/// Joins the text parts of the first candidate. `None` when nothing usable came back.
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.as_ref().and_then(|c| c.first());

    let text = candidate
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    if text.is_none() {
        let reason = candidate
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("none");
        warn!(finish_reason = reason, "Gemini returned empty text");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::types::*;

    fn make_response(parts: &[&str], finish_reason: Option<&str>) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(Content {
                    parts: parts
                        .iter()
                        .map(|t| Part {
                            text: t.to_string(),
                        })
                        .collect(),
                    role: Some("model".to_string()),
                }),
                finish_reason: finish_reason.map(str::to_string),
            }]),
            error: None,
        }
    }

    #[test]
    fn extracts_single_part() {
        let response = make_response(&["Shares rose after earnings."], Some("STOP"));
        assert_eq!(
            extract_text(&response).as_deref(),
            Some("Shares rose after earnings.")
        );
    }

    #[test]
    fn joins_multiple_parts_and_trims() {
        let response = make_response(&["  First half, ", "second half.\n"], Some("STOP"));
        assert_eq!(
            extract_text(&response).as_deref(),
            Some("First half, second half.")
        );
    }

    #[test]
    fn handles_missing_candidates() {
        let response = GenerateContentResponse {
            candidates: None,
            error: None,
        };
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn whitespace_only_is_empty() {
        let response = make_response(&["   "], Some("SAFETY"));
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn candidate_without_content_is_empty() {
        let response = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: None,
                finish_reason: Some("SAFETY".into()),
            }]),
            error: None,
        };
        assert!(extract_text(&response).is_none());
    }
}
