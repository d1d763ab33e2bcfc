//! Google Generative Language API driver.
//!
//! This module implements the [`LlmDriver`] trait for the
//! `models/{model}:generateContent` endpoint. The call is non-streaming: the
//! planner only ever needs the complete answer to classify it.

use std::time::Duration;

use serde::Deserialize;

use super::{Content, GenerateRequest, LlmDriver, LlmError, LlmSettings};

/// Driver for the Generative Language `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for GeminiDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl GeminiDriver {
    /// Create a new driver with the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()?;
        Ok(Self { http, settings })
    }

    /// Full URL of the `generateContent` method for the configured model.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Extract the first candidate's text from a raw response body.
fn candidate_text(body: &str) -> Result<String, LlmError> {
    let resp: GenerateResponse = serde_json::from_str(body)?;

    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::Blocked(reason));
    }

    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.text())
        .filter(|text| !text.is_empty())
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait::async_trait]
impl LlmDriver for GeminiDriver {
    async fn generate(&self, req: GenerateRequest) -> Result<String, LlmError> {
        let Some(key) = &self.settings.api_key else {
            return Err(LlmError::MissingApiKey);
        };

        let url = self.endpoint();
        tracing::debug!(
            url = %url,
            turn_count = req.contents.len(),
            "Sending generateContent request"
        );

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = candidate_text(&body)?;
        tracing::debug!(response_length = text.len(), "generateContent succeeded");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> LlmSettings {
        LlmSettings {
            base_url: base_url.to_string(),
            api_key: Some("test".to_string()),
            model: "gemini-2.5-flash".to_string(),
            request_timeout_secs: 5,
            connect_timeout_secs: 1,
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let driver = GeminiDriver::new(settings("https://generativelanguage.googleapis.com/")).unwrap();
        assert_eq!(
            driver.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_candidate_text_concatenates_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Sure, "}, {"text": "tell me more!"}]},
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(candidate_text(body).unwrap(), "Sure, tell me more!");
    }

    #[test]
    fn test_candidate_text_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(candidate_text(body), Err(LlmError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn test_candidate_text_empty() {
        assert!(matches!(
            candidate_text(r#"{"candidates": []}"#),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(
            candidate_text(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn test_candidate_text_rejects_non_json() {
        assert!(matches!(candidate_text("<html>"), Err(LlmError::Decode(_))));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let mut s = settings("http://127.0.0.1:9");
        s.api_key = None;
        let driver = GeminiDriver::new(s).unwrap();
        let req = GenerateRequest {
            system_instruction: Content::instruction("x"),
            contents: vec![Content::user("hi")],
            generation_config: crate::llm::GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: serde_json::Value::Null,
            },
        };
        assert!(matches!(
            driver.generate(req).await,
            Err(LlmError::MissingApiKey)
        ));
    }
}
