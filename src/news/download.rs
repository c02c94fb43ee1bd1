use reqwest::Client;
use tracing::debug;

use super::NewsError;

pub(crate) const MAX_RESPONSE_BYTES: usize = 10_000_000;

/// GET `url` and return the body as text, capped at `MAX_RESPONSE_BYTES`.
pub(crate) async fn download(client: &Client, url: &str) -> Result<String, NewsError> {
    let response = client
        .get(url)
        .header("User-Agent", crate::USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(NewsError::Status(status.as_u16()));
    }

    if let Some(len) = response.content_length()
        && len as usize > MAX_RESPONSE_BYTES
    {
        return Err(NewsError::TooLarge);
    }

    let mut body = Vec::new();
    let mut stream = response;
    while let Some(chunk) = stream.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() > MAX_RESPONSE_BYTES {
            return Err(NewsError::TooLarge);
        }
    }

    debug!(url, bytes = body.len(), "feed downloaded");
    Ok(String::from_utf8_lossy(&body).into_owned())
}
