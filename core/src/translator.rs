//! Client for the generative translation service.
//!
//! One blocking round-trip per procedure against an OpenAI-compatible
//! chat-completions endpoint. Low temperature keeps output close to
//! reproducible. Every failure mode (connect, timeout, HTTP status,
//! malformed body) surfaces as `CoreError::Translation`; a failed
//! translation is a typed error, never text masquerading as code.

use crate::{
    config::TranslatorConfig,
    error::{CoreError, CoreResult},
    prompt::SYSTEM_INSTRUCTIONS,
};
use serde::{Deserialize, Serialize};

const TEMPERATURE: f32 = 0.2;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct Translator {
    client: reqwest::Client,
    cfg: TranslatorConfig,
}

impl Translator {
    pub fn new(cfg: TranslatorConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| CoreError::Translation(format!("building HTTP client: {e}")))?;
        Ok(Self { client, cfg })
    }

    /// Send one prompt and return the generated text.
    pub async fn translate(&self, prompt: &str) -> CoreResult<String> {
        let request = ChatRequest {
            model: &self.cfg.model,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_INSTRUCTIONS },
                ChatMessage { role: "user", content: prompt },
            ],
        };

        let response = self
            .client
            .post(&self.cfg.endpoint)
            .bearer_auth(&self.cfg.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CoreError::Translation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Translation(format!(
                "service returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Translation(format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CoreError::Translation("response contained no choices".into()))
    }
}
