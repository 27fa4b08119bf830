//! Hosted Gemini `generateContent` backend (feature `gemini`).

use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::json;

use crate::annotate::topic::CompletionBackend;
use crate::error::{PrepError, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| PrepError::configuration(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_output_tokens: 50,
        })
    }

    /// Use `api_key` if given, otherwise the `GOOGLE_API_KEY` environment variable.
    pub fn from_env_or(api_key: Option<String>) -> Result<Self> {
        let key = api_key
            .filter(|k| !k.is_empty())
            .or_else(|| env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
            .ok_or_else(|| {
                PrepError::configuration(format!(
                    "Google API key not found; set {API_KEY_ENV} or pass an explicit key"
                ))
            })?;
        Self::new(key)
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }
}

impl CompletionBackend for GeminiBackend {
    fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{ENDPOINT}/{}:generateContent", self.model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
            }
        });

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| PrepError::annotation(format!("request failed: {e}")))?;

        let status = resp.status();
        if status.is_client_error() {
            let text = resp.text().unwrap_or_default();
            return Err(PrepError::invalid_argument(format!(
                "Gemini rejected request ({status}): {text}"
            )));
        }
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(PrepError::annotation(format!(
                "Gemini API error ({status}): {text}"
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .map_err(|e| PrepError::annotation(format!("unreadable response: {e}")))?;
        json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .and_then(|parts| parts.first())
            .and_then(|p| p["text"].as_str())
            .map(str::to_string)
            .ok_or_else(|| PrepError::annotation("response has no candidate text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        let backend = GeminiBackend::from_env_or(Some("k".to_string()))
            .unwrap()
            .model("gemini-test");
        assert_eq!(backend.api_key, "k");
        assert_eq!(backend.model, "gemini-test");
    }
}
