use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CommandError;
use crate::models::MedicalRecord;
use crate::pipeline::structuring::HealthAssistant;
use crate::pipeline::summary::{parse_summary, ParsedDocument};

/// A generated health summary, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSummary {
    pub document: ParsedDocument,
    pub record_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Ask the model for a narrative summary of `records` and parse it.
pub fn generate_summary(
    assistant: &HealthAssistant,
    records: &[MedicalRecord],
) -> Result<HealthSummary, CommandError> {
    let text = assistant.summarize_records(records)?;
    let document = parse_summary(&text);
    tracing::debug!(
        sections = document.sections.len(),
        cards = document.card_count(),
        "Summary parsed"
    );
    Ok(HealthSummary {
        document,
        record_count: records.len(),
        generated_at: Utc::now(),
    })
}

/// [`generate_summary`] on the blocking pool, for callers on the async runtime.
///
/// Dropping the returned future abandons the result; the HTTP request itself
/// runs to completion or timeout in the background.
pub async fn generate_summary_async(
    assistant: Arc<HealthAssistant>,
    records: Vec<MedicalRecord>,
) -> Result<HealthSummary, CommandError> {
    tokio::task::spawn_blocking(move || generate_summary(&assistant, &records))
        .await
        .map_err(|e| CommandError::Task(e.to_string()))?
}
