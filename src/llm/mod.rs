//! Generative-language driver traits and implementations.
//!
//! This module provides the wire types for a single stateless
//! `generateContent` call and the [`LlmDriver`] trait that the planner talks
//! to. Conversation state lives with the caller: every request carries the
//! full history of the session it belongs to.
//!
//! # Drivers
//!
//! - [`GeminiDriver`]: Google Generative Language API (`:generateContent`)
//!
//! # Example
//!
//! ```rust,ignore
//! use vayama::llm::{GeminiDriver, LlmSettings};
//!
//! let settings = LlmSettings {
//!     base_url: "https://generativelanguage.googleapis.com".to_string(),
//!     api_key: Some("AIza...".to_string()),
//!     model: "gemini-2.5-flash".to_string(),
//!     request_timeout_secs: 60,
//!     connect_timeout_secs: 10,
//! };
//! let driver = GeminiDriver::new(settings)?;
//! ```

pub mod gemini;
#[cfg(test)]
pub(crate) mod scripted;

pub use gemini::GeminiDriver;

use serde::{Deserialize, Serialize};

/// Default model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default base URL of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// LLM connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL for the API (e.g., `https://generativelanguage.googleapis.com`).
    pub base_url: String,
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `gemini-2.5-flash`).
    pub model: String,
    /// Whole-request timeout.
    pub request_timeout_secs: u64,
    /// TCP connect timeout.
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
        }
    }
}

/// Author of a [`Content`] turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the assistant.
    User,
    /// The remote model.
    Model,
}

/// A text part of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// The text content.
    #[serde(default)]
    pub text: String,
}

/// One turn of a conversation, or the system instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Author; absent for the system instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Ordered parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn holding `text`.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(Some(Role::User), text)
    }

    /// A model turn holding `text`.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role(Some(Role::Model), text)
    }

    /// A role-less content block, as used for the system instruction.
    #[must_use]
    pub fn instruction(text: impl Into<String>) -> Self {
        Self::with_role(None, text)
    }

    fn with_role(role: Option<Role>, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// Concatenated text of all parts.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Output constraints attached to every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type the model must answer with.
    pub response_mime_type: String,
    /// Schema the answer must conform to.
    pub response_schema: serde_json::Value,
}

/// Request to an LLM driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Fixed instruction selected when the session was created.
    pub system_instruction: Content,
    /// Prior turns followed by the new user turn.
    pub contents: Vec<Content>,
    /// Response format constraints.
    pub generation_config: GenerationConfig,
}

/// Errors returned by an [`LlmDriver`].
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No API key was configured.
    #[error("no API key configured for the generative-language endpoint")]
    MissingApiKey,

    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The prompt was rejected by the endpoint's safety filters.
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// No candidate text came back.
    #[error("response contained no candidate text")]
    EmptyResponse,

    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Trait for generative-language drivers.
///
/// Implementations perform one stateless request/response exchange.
#[async_trait::async_trait]
pub trait LlmDriver: Send + Sync {
    /// Generate the next model turn for `req` and return its text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no text is produced.
    async fn generate(&self, req: GenerateRequest) -> Result<String, LlmError>;
}
