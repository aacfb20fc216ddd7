use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::AiError;
use crate::config::AiSettings;

/// Ollama HTTP client for local model inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a client pointing at an Ollama instance.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AiError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_settings(settings: &AiSettings) -> Result<Self, AiError> {
        Self::new(&settings.base_url, settings.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> AiError {
        if e.is_connect() {
            AiError::OllamaConnection(self.base_url.clone())
        } else if e.is_timeout() {
            AiError::Timeout(self.timeout_secs)
        } else {
            AiError::HttpClient(e.to_string())
        }
    }

    fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, AiError>
    where
        B: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        Self::read_json(response)
    }

    fn read_json<R>(response: reqwest::blocking::Response) -> Result<R, AiError>
    where
        R: for<'de> Deserialize<'de>,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AiError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .map_err(|e| AiError::ResponseParsing(e.to_string()))
    }
}

/// Low temperature keeps summaries close to the records.
const GENERATION_TEMPERATURE: f32 = 0.2;

#[derive(Serialize)]
struct GenerationOptions {
    temperature: f32,
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerationOptions,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Request body for Ollama /api/chat
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: GenerationOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [String]>,
}

/// Response body from Ollama /api/chat
#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

fn chat_messages<'a>(
    prompt: &'a str,
    images: &'a [String],
    system: Option<&'a str>,
) -> Vec<ChatMessage<'a>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(ChatMessage {
            role: "system",
            content: system,
            images: None,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
        images: Some(images),
    });
    messages
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiError> {
        let body = GenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            options: GenerationOptions {
                temperature: GENERATION_TEMPERATURE,
            },
        };
        let parsed: GenerateResponse = self.post_json("/api/generate", &body)?;
        Ok(parsed.response)
    }

    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images: &[String],
        system: Option<&str>,
    ) -> Result<String, AiError> {
        let body = ChatRequest {
            model,
            messages: chat_messages(prompt, images, system),
            stream: false,
            options: GenerationOptions {
                temperature: GENERATION_TEMPERATURE,
            },
        };
        let parsed: ChatResponse = self.post_json("/api/chat", &body)?;
        Ok(parsed.message.content)
    }

    fn list_models(&self) -> Result<Vec<String>, AiError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        let parsed: TagsResponse = Self::read_json(response)?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// A call observed by [`MockLlmClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub image_count: usize,
}

/// Mock LLM client for testing. Returns a configurable response or failure.
pub struct MockLlmClient {
    response: String,
    failure_status: Option<u16>,
    available_models: Vec<String>,
    calls: Mutex<Vec<RecordedCall>>,
    list_calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            failure_status: None,
            available_models: vec!["medgemma:4b".to_string()],
            calls: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails with an Ollama error carrying `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            failure_status: Some(status),
            ..Self::new("")
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    /// Calls made so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of `list_models` requests so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn respond(&self, model: &str, prompt: &str, image_count: usize) -> Result<String, AiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                model: model.to_string(),
                prompt: prompt.to_string(),
                image_count,
            });
        }
        match self.failure_status {
            Some(status) => Err(AiError::OllamaError {
                status,
                body: "mock failure".into(),
            }),
            None => Ok(self.response.clone()),
        }
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        _system: Option<&str>,
    ) -> Result<String, AiError> {
        self.respond(model, prompt, 0)
    }

    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images: &[String],
        _system: Option<&str>,
    ) -> Result<String, AiError> {
        self.respond(model, prompt, images.len())
    }

    fn list_models(&self) -> Result<Vec<String>, AiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.available_models.clone())
    }
}
