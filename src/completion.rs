use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

const COMPLETION_API_URL: &str = "https://api.openai.com/v1/completions";

const MODEL: &str = "text-davinci-002";

// Group messages are meant to be short quips
const MAX_TOKENS: u32 = 60;
const TEMPERATURE: f32 = 0.5;
const TOP_P: f32 = 0.3;
const FREQUENCY_PENALTY: f32 = 0.5;
const PRESENCE_PENALTY: f32 = 0.0;

const PERSONA: &str =
    "Marv is a chatbot that reluctantly answers questions with sarcastic responses:";

/// Wraps user text in the persona preamble and response cue.
pub fn build_prompt(text: &str) -> String {
    format!("{PERSONA}\n\nYou: {text}\nMarv: ")
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    text: String,
}

pub struct CompletionClient {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl CompletionClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url: COMPLETION_API_URL.to_string(),
        }
    }

    /// Points the client at another endpoint, e.g. a mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Returns the first generated alternative, untrimmed.
    pub async fn complete(&self, text: &str) -> Result<String> {
        let request = CompletionRequest {
            model: MODEL,
            prompt: build_prompt(text),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        };

        debug!(
            "Sending completion request with {} character prompt",
            request.prompt.len()
        );

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(BotError::CompletionApi { status, message });
        }

        let api_response: CompletionResponse = response.json().await?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::CompletionResponse("No choices in response".to_string()))?
            .text;

        debug!("Received completion of {} characters", text.len());
        Ok(text)
    }
}
