use async_trait::async_trait;
use nh_core::ports::{SummaryError, SummaryGeneratorPort};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` client.
pub struct GeminiSummaryClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiSummaryClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Points the client at a different host (proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl SummaryGeneratorPort for GeminiSummaryClient {
    async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<Option<String>, SummaryError> {
        if self.api_key.is_empty() {
            return Err(SummaryError::NotConfigured);
        }

        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system_instruction }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SummaryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SummaryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::Request(e.to_string()))?;
        debug!(model = %self.model, "summary generated");
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(endpoint: String, key: &str) -> GeminiSummaryClient {
        GeminiSummaryClient::new(reqwest::Client::new(), key, "gemini-test").with_endpoint(endpoint)
    }

    #[tokio::test]
    async fn sends_instruction_and_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .match_header("x-goog-api-key", "k")
            .match_body(Matcher::PartialJson(json!({
                "systemInstruction": {"parts": [{"text": "be brief"}]},
                "contents": [{"role": "user", "parts": [{"text": "reports"}]}]
            })))
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"All "},{"text":"good."}]}}]}"#,
            )
            .create_async()
            .await;

        let text = client(server.url(), "k")
            .generate("be brief", "reports")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(text.as_deref(), Some("All good."));
    }

    #[tokio::test]
    async fn empty_candidates_yield_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let text = client(server.url(), "k").generate("s", "p").await.unwrap();
        assert_eq!(text, None);
    }

    #[tokio::test]
    async fn error_status_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(403)
            .with_body("API key invalid")
            .create_async()
            .await;

        let err = client(server.url(), "k").generate("s", "p").await.unwrap_err();
        assert!(matches!(err, SummaryError::Rejected { status: 403, .. }));
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let err = client("http://127.0.0.1:9".into(), "")
            .generate("s", "p")
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::NotConfigured));
    }
}
