//! Translating stage: send the recognized text to a chat-completion service.
//!
//! This is the one stage whose failure aborts the whole run — there is no
//! fallback translation path. Auth, network, quota, and malformed-response
//! errors all propagate unmodified to the caller.
//!
//! The credential is always an explicit constructor argument. Nothing in
//! this module reads the process environment; only the CLI binary sources
//! `OPENAI_API_KEY` and forwards it through
//! [`crate::config::PipelineConfig::api_key`].

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::prompts;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Translates one block of recognized text to English.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text`; an empty input is still a valid request.
    async fn translate(&self, text: &str) -> Result<String, PipelineError>;
}

/// Resolve the translator for a run.
///
/// A pre-constructed [`PipelineConfig::translator`] takes priority (tests,
/// custom middleware); otherwise an [`OpenAiTranslator`] is built from the
/// configured credential.
pub fn create_translator(config: &PipelineConfig) -> Result<Arc<dyn Translator>, PipelineError> {
    if let Some(ref translator) = config.translator {
        return Ok(Arc::clone(translator));
    }

    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| PipelineError::TranslatorNotConfigured {
            hint: "Pass PipelineConfig::api_key (the CLI forwards OPENAI_API_KEY), \
                   or inject a custom Translator."
                .to_string(),
        })?;

    Ok(Arc::new(OpenAiTranslator::new(
        api_key,
        &config.model,
        &config.base_url,
        &config.source_language,
    )))
}

impl std::fmt::Debug for dyn Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<dyn Translator>")
    }
}

/// The production translator: an OpenAI-compatible `/chat/completions`
/// endpoint with the fixed quality-flagging persona from [`crate::prompts`].
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    source_language: String,
}

impl OpenAiTranslator {
    pub fn new(api_key: &str, model: &str, base_url: &str, source_language: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            source_language: source_language.to_string(),
        }
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str) -> Result<String, PipelineError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::system_prompt(&self.source_language),
                },
                ChatMessage {
                    role: "user",
                    content: prompts::user_prompt(&self.source_language, text),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("Translation request: {} chars to {}", text.chars().count(), url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::TranslationFailed {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::TranslationFailed {
                detail: format!("HTTP {status}: {}", body.trim()),
            });
        }

        let payload: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| PipelineError::TranslationMalformed {
                    detail: e.to_string(),
                })?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PipelineError::TranslationMalformed {
                detail: "response contained no choices".to_string(),
            })
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_persona_and_text() {
        let t = OpenAiTranslator::new("sk-test", "gpt-4", "https://api.openai.com/v1", "Arabic");
        let request = ChatRequest {
            model: &t.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::system_prompt(&t.source_language),
                },
                ChatMessage {
                    role: "user",
                    content: prompts::user_prompt(&t.source_language, "مرحبا"),
                },
            ],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"gpt-4\""));
        assert!(json.contains("Arabic to English"));
        assert!(json.contains("مرحبا"));
    }

    #[test]
    fn response_deserializes_first_choice() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "Hello world"}}
            ]
        }"#;
        let payload: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.choices[0].message.content, "Hello world");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let t = OpenAiTranslator::new("k", "gpt-4", "https://api.openai.com/v1/", "Arabic");
        assert_eq!(t.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn create_translator_requires_a_key() {
        let config = PipelineConfig::default();
        let err = create_translator(&config).unwrap_err();
        assert!(matches!(err, PipelineError::TranslatorNotConfigured { .. }));
    }

    #[test]
    fn create_translator_accepts_configured_key() {
        let config = PipelineConfig::builder().api_key("sk-test").build().unwrap();
        assert!(create_translator(&config).is_ok());
    }
}
