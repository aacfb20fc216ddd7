//! Use-case entry points called by the front end.
//!
//! Each command leaves state untouched when the model call fails, so the
//! caller can offer a retry.

pub mod records;
pub mod scan;
pub mod summary;

use serde::Serialize;
use thiserror::Error;

use crate::capture::CaptureError;
use crate::navigation::NavigationError;
use crate::pipeline::structuring::{model_matches, AiError, HealthAssistant};
use crate::records::StoreError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("This record has no image to analyze")]
    NoImage,

    #[error("AI request failed: {0}")]
    Ai(#[from] AiError),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Cancelled")]
    Cancelled,
}

impl CommandError {
    /// Short message for the user, in the app's display language.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoImage => "该记录没有图片可供分析",
            Self::Capture(_) => "无法访问摄像头，请确保您已授予相机权限。",
            Self::Navigation(NavigationError::EmptyName) => "请输入您的姓名",
            Self::Cancelled => "已取消",
            _ => "操作失败，请稍后重试。",
        }
    }
}

/// Reachability of the model server and whether the configured model is installed.
#[derive(Debug, Clone, Serialize)]
pub struct AiStatus {
    pub model: String,
    pub reachable: bool,
    pub model_available: bool,
    pub installed_models: Vec<String>,
    pub error: Option<String>,
}

pub fn check_ai_status(assistant: &HealthAssistant) -> AiStatus {
    let model = assistant.model().to_string();
    match assistant.available_models() {
        Ok(installed_models) => {
            let model_available = installed_models
                .iter()
                .any(|installed| model_matches(installed, &model));
            if !model_available {
                tracing::warn!(model = %model, "Configured model is not installed");
            }
            AiStatus {
                model,
                reachable: true,
                model_available,
                installed_models,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI server unreachable");
            AiStatus {
                model,
                reachable: false,
                model_available: false,
                installed_models: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pipeline::structuring::MockLlmClient;

    #[test]
    fn status_reports_installed_model() {
        let a = HealthAssistant::new(Arc::new(MockLlmClient::new("")), "medgemma:4b");
        let status = check_ai_status(&a);
        assert!(status.reachable);
        assert!(status.model_available);
        assert_eq!(status.installed_models, vec!["medgemma:4b".to_string()]);
        assert!(status.error.is_none());
    }

    #[test]
    fn status_flags_missing_model() {
        let mock = MockLlmClient::new("").with_models(vec!["llava:7b".into()]);
        let a = HealthAssistant::new(Arc::new(mock), "medgemma:4b");
        let status = check_ai_status(&a);
        assert!(status.reachable);
        assert!(!status.model_available);
    }

    #[test]
    fn status_lists_models_once() {
        let mock = Arc::new(MockLlmClient::new("").with_models(vec!["medgemma:4b".into()]));
        let a = HealthAssistant::new(mock.clone(), "medgemma");
        assert!(check_ai_status(&a).model_available);
        assert!(mock.calls().is_empty());
        assert_eq!(mock.list_calls(), 1);
    }

    #[test]
    fn status_rejects_model_name_prefix() {
        let mock = MockLlmClient::new("").with_models(vec!["medgemma:4b".into()]);
        let a = HealthAssistant::new(Arc::new(mock), "med");
        assert!(!check_ai_status(&a).model_available);
    }

    #[test]
    fn user_messages() {
        assert_eq!(CommandError::NoImage.user_message(), "该记录没有图片可供分析");
        assert_eq!(
            CommandError::from(AiError::Timeout(30)).user_message(),
            "操作失败，请稍后重试。"
        );
        assert_eq!(
            CommandError::from(NavigationError::EmptyName).user_message(),
            "请输入您的姓名"
        );
    }

    #[test]
    fn display_wraps_source() {
        let err = CommandError::from(AiError::OllamaConnection("http://localhost:11434".into()));
        assert_eq!(
            err.to_string(),
            "AI request failed: Ollama is not running at http://localhost:11434"
        );
    }
}
