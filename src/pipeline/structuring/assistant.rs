use std::sync::Arc;

use super::prompt::{
    analysis_prompt, build_summary_prompt, ASSISTANT_SYSTEM_PROMPT, IDENTIFY_MEDICATION_PROMPT,
};
use super::types::{LlmClient, MedicationIdentification};
use super::AiError;
use crate::capture::base64_payload;
use crate::models::{MedicalRecord, RecordCategory};

/// Returned instead of calling the model when there is nothing to summarize.
pub const NO_RECORDS_NOTICE: &str = "暂无记录可供分析。";
pub const EMPTY_SUMMARY_NOTICE: &str = "无法生成摘要。";
pub const EMPTY_ANALYSIS_NOTICE: &str = "无法识别图片内容。";

/// High-level model operations used by the app.
pub struct HealthAssistant {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl HealthAssistant {
    pub fn new(client: Arc<dyn LlmClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Models installed on the server.
    pub fn available_models(&self) -> Result<Vec<String>, AiError> {
        self.client.list_models()
    }

    /// Narrative summary across all records, in the sectioned text layout.
    pub fn summarize_records(&self, records: &[MedicalRecord]) -> Result<String, AiError> {
        if records.is_empty() {
            tracing::info!("No records to summarize, skipping model call");
            return Ok(NO_RECORDS_NOTICE.to_string());
        }

        let _span = tracing::info_span!(
            "summarize_records",
            model = %self.model,
            record_count = records.len(),
        )
        .entered();
        let start = std::time::Instant::now();

        let prompt = build_summary_prompt(records);
        let response = self
            .client
            .generate(&self.model, &prompt, Some(ASSISTANT_SYSTEM_PROMPT))
            .inspect_err(|e| tracing::warn!(error = %e, "Summary generation failed"))?;

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            response_len = response.len(),
            "Summary generated"
        );

        Ok(non_empty_or(response, EMPTY_SUMMARY_NOTICE))
    }

    /// Recognise a medication package from a photo (data URL or bare base64).
    pub fn identify_medication(&self, image: &str) -> Result<MedicationIdentification, AiError> {
        let payload = image_payload(image)?;
        let _span = tracing::info_span!(
            "identify_medication",
            model = %self.model,
            image_size = payload.len(),
        )
        .entered();

        let response = self
            .client
            .chat_with_images(&self.model, IDENTIFY_MEDICATION_PROMPT, &[payload], None)
            .inspect_err(|e| tracing::warn!(error = %e, "Medication identification failed"))?;

        let identification = parse_identification(&response)?;
        tracing::info!(
            recognised = !identification.name.is_empty(),
            "Medication identification complete"
        );
        Ok(identification)
    }

    /// Refined description of a record photo, prompted per category.
    pub fn analyze_image(&self, image: &str, category: RecordCategory) -> Result<String, AiError> {
        let payload = image_payload(image)?;
        let _span = tracing::info_span!(
            "analyze_image",
            model = %self.model,
            category = %category,
            image_size = payload.len(),
        )
        .entered();

        let response = self
            .client
            .chat_with_images(
                &self.model,
                analysis_prompt(category),
                &[payload],
                Some(ASSISTANT_SYSTEM_PROMPT),
            )
            .inspect_err(|e| tracing::warn!(error = %e, "Image analysis failed"))?;

        Ok(non_empty_or(response, EMPTY_ANALYSIS_NOTICE))
    }
}

fn non_empty_or(response: String, fallback: &str) -> String {
    if response.trim().is_empty() {
        fallback.to_string()
    } else {
        response
    }
}

/// Base64 payload for the model. Remote URLs are rejected; only local
/// captures and uploads carry image bytes.
fn image_payload(image: &str) -> Result<String, AiError> {
    let trimmed = image.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Err(AiError::RemoteImage(trimmed.to_string()));
    }
    let payload = base64_payload(trimmed);
    if payload.is_empty() {
        return Err(AiError::EmptyImage);
    }
    Ok(payload.to_string())
}

/// Parse the identification JSON. Tolerates ```json fences and prose around the object.
/// An empty response yields an empty identification.
fn parse_identification(response: &str) -> Result<MedicationIdentification, AiError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Ok(MedicationIdentification::default());
    }

    let json = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => {
            return Err(AiError::JsonParsing(
                "No JSON object in identification response".into(),
            ))
        }
    };

    let mut parsed: MedicationIdentification =
        serde_json::from_str(json).map_err(|e| AiError::JsonParsing(e.to_string()))?;
    parsed.name = parsed.name.trim().to_string();
    parsed.description = parsed.description.trim().to_string();
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MedicationStatus, NewRecord};
    use crate::pipeline::structuring::ollama::MockLlmClient;
    use chrono::NaiveDate;

    fn assistant(mock: Arc<MockLlmClient>) -> HealthAssistant {
        HealthAssistant::new(mock, "medgemma:4b")
    }

    fn sample_record() -> MedicalRecord {
        MedicalRecord::from_new(NewRecord {
            category: RecordCategory::Medication,
            title: "头孢克肟分散片".into(),
            date: NaiveDate::from_ymd_opt(2023, 10, 15).unwrap(),
            description: "每日两次，每次一片。抗生素治疗。".into(),
            image: None,
            status: Some(MedicationStatus::Past),
        })
    }

    #[test]
    fn available_models_come_from_client() {
        let mock = Arc::new(MockLlmClient::new("").with_models(vec!["llava:7b".into()]));
        let a = assistant(mock);
        assert_eq!(a.available_models().unwrap(), vec!["llava:7b".to_string()]);
    }

    #[test]
    fn summarize_skips_model_without_records() {
        let mock = Arc::new(MockLlmClient::new("should not be used"));
        let text = assistant(mock.clone()).summarize_records(&[]).unwrap();
        assert_eq!(text, NO_RECORDS_NOTICE);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn summarize_sends_records_in_prompt() {
        let mock = Arc::new(MockLlmClient::new("# 总体健康概况\n稳定"));
        let text = assistant(mock.clone())
            .summarize_records(&[sample_record()])
            .unwrap();
        assert_eq!(text, "# 总体健康概况\n稳定");

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "medgemma:4b");
        assert!(calls[0].prompt.contains("头孢克肟分散片"));
        assert!(calls[0].prompt.contains("既往/已结束"));
    }

    #[test]
    fn summarize_empty_response_uses_notice() {
        let mock = Arc::new(MockLlmClient::new("  \n"));
        let text = assistant(mock).summarize_records(&[sample_record()]).unwrap();
        assert_eq!(text, EMPTY_SUMMARY_NOTICE);
    }

    #[test]
    fn summarize_propagates_failure() {
        let mock = Arc::new(MockLlmClient::failing(503));
        let err = assistant(mock)
            .summarize_records(&[sample_record()])
            .unwrap_err();
        assert!(matches!(err, AiError::OllamaError { status: 503, .. }));
    }

    #[test]
    fn identify_parses_json() {
        let mock = Arc::new(MockLlmClient::new(
            r#"{"name": "阿莫西林胶囊", "description": "【适应症】敏感菌感染"}"#,
        ));
        let result = assistant(mock.clone())
            .identify_medication("data:image/jpeg;base64,QUJDRA==")
            .unwrap();
        assert_eq!(result.name, "阿莫西林胶囊");
        assert_eq!(result.description, "【适应症】敏感菌感染");
        assert_eq!(mock.calls()[0].image_count, 1);
    }

    #[test]
    fn identify_tolerates_fences() {
        let response = "好的：\n```json\n{\"name\": \"未知药物\", \"description\": \"\"}\n```";
        let parsed = parse_identification(response).unwrap();
        assert_eq!(parsed.name, "未知药物");
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn identify_missing_fields_default() {
        let parsed = parse_identification(r#"{"name": "布洛芬"}"#).unwrap();
        assert_eq!(parsed.name, "布洛芬");
        assert!(parsed.description.is_empty());
    }

    #[test]
    fn identify_empty_response_is_empty_pair() {
        assert_eq!(
            parse_identification("").unwrap(),
            MedicationIdentification::default()
        );
    }

    #[test]
    fn identify_non_json_is_error() {
        assert!(matches!(
            parse_identification("无法识别"),
            Err(AiError::JsonParsing(_))
        ));
        assert!(matches!(
            parse_identification("{not json}"),
            Err(AiError::JsonParsing(_))
        ));
    }

    #[test]
    fn analyze_uses_category_prompt() {
        let mock = Arc::new(MockLlmClient::new("【检查结果分析】WBC 偏高"));
        let text = assistant(mock.clone())
            .analyze_image("QUJDRA==", RecordCategory::LabResult)
            .unwrap();
        assert_eq!(text, "【检查结果分析】WBC 偏高");
        assert!(mock.calls()[0].prompt.contains("化验单"));
    }

    #[test]
    fn analyze_empty_response_uses_notice() {
        let mock = Arc::new(MockLlmClient::new(""));
        let text = assistant(mock)
            .analyze_image("QUJDRA==", RecordCategory::Billing)
            .unwrap();
        assert_eq!(text, EMPTY_ANALYSIS_NOTICE);
    }

    #[test]
    fn remote_and_empty_images_rejected() {
        let mock = Arc::new(MockLlmClient::new("x"));
        let a = assistant(mock.clone());
        assert!(matches!(
            a.analyze_image("https://picsum.photos/400/600", RecordCategory::Admission),
            Err(AiError::RemoteImage(_))
        ));
        assert!(matches!(
            a.identify_medication("data:image/jpeg;base64,"),
            Err(AiError::EmptyImage)
        ));
        assert!(mock.calls().is_empty());
    }
}
