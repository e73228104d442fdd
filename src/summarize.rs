use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SummarizeError;
use crate::settings::Settings;

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";

/// Turns aggregate text into a summary, or `None` when no summary could be had.
pub trait Summarizer {
    fn summarize(&self, input: &str, system_instruction: Option<&str>) -> Option<String>;
}

#[derive(Clone)]
pub struct ChatConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl ChatConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        ChatConfig {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: settings.model.clone(),
            timeout: settings.timeout(),
        }
    }
}

/// Chat-completion request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Fire-once chat-completion client. One POST per call, no retries.
pub struct ChatClient {
    http: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_http(http, config))
    }

    pub fn with_http(http: Client, config: ChatConfig) -> Self {
        ChatClient { http, config }
    }

    fn request(&self, input: &str, system_instruction: Option<&str>) -> Result<String, SummarizeError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SummarizeError::MissingCredential)?;

        let body = build_request(
            &self.config.model,
            system_instruction.unwrap_or(DEFAULT_SYSTEM_INSTRUCTION),
            input,
        );
        debug!(endpoint = %self.config.endpoint, chars = input.len(), "Sending completion request");

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::Status(status));
        }
        let text = response.text()?;
        parse_completion(&text)
    }
}

impl Summarizer for ChatClient {
    fn summarize(&self, input: &str, system_instruction: Option<&str>) -> Option<String> {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Summarizing...");
        pb.enable_steady_tick(Duration::from_millis(120));

        let result = self.request(input, system_instruction);
        pb.finish_and_clear();

        match result {
            Ok(summary) => {
                info!(chars = summary.len(), "Received summary");
                Some(summary)
            }
            Err(e) => {
                warn!(error = %e, "Summarization unavailable");
                None
            }
        }
    }
}

fn build_request<'a>(model: &'a str, system: &'a str, input: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: [
            Message {
                role: "system",
                content: system,
            },
            Message {
                role: "user",
                content: input,
            },
        ],
    }
}

/// Pull `choices[0].message.content` out of a response body, trimmed.
pub fn parse_completion(body: &str) -> Result<String, SummarizeError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| SummarizeError::Malformed(e.to_string()))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| SummarizeError::Malformed("no choices".to_string()))?
        .message
        .content
        .ok_or(SummarizeError::EmptyCompletion)?;

    let summary = content.trim();
    if summary.is_empty() {
        return Err(SummarizeError::EmptyCompletion);
    }
    Ok(summary.to_string())
}
