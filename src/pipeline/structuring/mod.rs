//! AI gateway: prompts, the Ollama client and the `HealthAssistant` that
//! turns records and photos into model calls.

pub mod assistant;
pub mod ollama;
pub mod prompt;
pub mod sanitize;
pub mod types;

pub use assistant::*;
pub use ollama::*;
pub use prompt::*;
pub use sanitize::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Image payload is empty")]
    EmptyImage,

    #[error("Only captured or uploaded images can be analyzed, got {0}")]
    RemoteImage(String),
}
