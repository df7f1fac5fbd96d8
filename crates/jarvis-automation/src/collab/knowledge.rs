//! Wikipedia summaries over the REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::Knowledge;
use crate::error::ActionError;

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

/// Client for `GET {base}/page/summary/{title}`.
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ActionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("jarvis/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn summary_url(&self, term: &str) -> String {
        let title = term.trim().replace(' ', "_");
        format!(
            "{}/page/summary/{}",
            self.base_url,
            urlencoding::encode(&title)
        )
    }
}

#[async_trait]
impl Knowledge for WikipediaClient {
    async fn summary(&self, term: &str, sentences: usize) -> Result<String, ActionError> {
        let url = self.summary_url(term);
        tracing::debug!(url = %url, "Fetching Wikipedia summary");

        let page: PageSummary = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = first_sentences(&page.extract, sentences);
        if text.is_empty() {
            return Err(ActionError::Lookup(format!("no summary for '{}'", term)));
        }
        Ok(text)
    }
}

/// The first `n` sentences of `text` (at least one if any text exists).
pub(crate) fn first_sentences(text: &str, n: usize) -> String {
    let text = text.trim();
    let n = n.max(1);
    let mut end = text.len();
    let mut seen = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if matches!(b, b'.' | b'!' | b'?') {
            let at_boundary = i + 1 == bytes.len() || bytes[i + 1].is_ascii_whitespace();
            if at_boundary {
                seen += 1;
                if seen == n {
                    end = i + 1;
                    break;
                }
            }
        }
    }
    text[..end].to_string()
}
