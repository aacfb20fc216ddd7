use uuid::Uuid;

use super::CommandError;
use crate::core_state::AppState;
use crate::models::MedicalRecord;
use crate::pipeline::structuring::HealthAssistant;
use crate::records::StoreError;

/// Save the add-record form as a new record and reset the form.
pub fn add_record(state: &mut AppState) -> &MedicalRecord {
    let input = state.form.submit();
    state.add_record(input)
}

/// Replace a record's description with an analysis of its photo.
///
/// The description is only written after the model call succeeds.
pub fn analyze_record(
    assistant: &HealthAssistant,
    state: &mut AppState,
    id: Uuid,
) -> Result<MedicalRecord, CommandError> {
    let record = state.records().get(id).ok_or(StoreError::NotFound(id))?;
    let image = match &record.image {
        Some(image) if record.has_image() => image.clone(),
        _ => return Err(CommandError::NoImage),
    };
    let category = record.category;

    let refined = assistant.analyze_image(&image, category)?;
    let updated = state.update_description(id, refined)?;
    tracing::info!(record_id = %id, "Record description refined from photo");
    Ok(updated.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::models::RecordCategory;
    use crate::pipeline::structuring::MockLlmClient;

    fn assistant(mock: MockLlmClient) -> HealthAssistant {
        HealthAssistant::new(Arc::new(mock), "medgemma:4b")
    }

    fn state_with_photo_record() -> (AppState, Uuid) {
        let mut state = AppState::with_samples();
        state.form.category = RecordCategory::LabResult;
        state.form.title = "肝功能".into();
        state.form.description = "待分析".into();
        state.form.attach_image("data:image/jpeg;base64,QUJDRA==".into());
        let id = add_record(&mut state).id;
        (state, id)
    }

    #[test]
    fn add_record_uses_form_and_resets_it() {
        let (state, id) = state_with_photo_record();
        assert_eq!(state.records().all()[0].id, id);
        assert_eq!(state.records().len(), 9);
        assert!(state.form.title.is_empty());
        assert!(state.form.image.is_none());
    }

    #[test]
    fn analyze_replaces_description() {
        let (mut state, id) = state_with_photo_record();
        let a = assistant(MockLlmClient::new("【检查结果分析】ALT 偏高"));
        let updated = analyze_record(&a, &mut state, id).unwrap();
        assert_eq!(updated.description, "【检查结果分析】ALT 偏高");
        assert_eq!(
            state.records().get(id).unwrap().description,
            "【检查结果分析】ALT 偏高"
        );
    }

    #[test]
    fn failed_analysis_keeps_description() {
        let (mut state, id) = state_with_photo_record();
        let a = assistant(MockLlmClient::failing(500));
        let err = analyze_record(&a, &mut state, id).unwrap_err();
        assert!(matches!(err, CommandError::Ai(_)));
        assert_eq!(state.records().get(id).unwrap().description, "待分析");
    }

    #[test]
    fn record_without_image_is_rejected() {
        let mut state = AppState::with_samples();
        state.form.title = "无图记录".into();
        let id = add_record(&mut state).id;
        let a = assistant(MockLlmClient::new("unused"));
        assert!(matches!(
            analyze_record(&a, &mut state, id),
            Err(CommandError::NoImage)
        ));
    }

    #[test]
    fn unknown_record_is_store_error() {
        let mut state = AppState::with_samples();
        let a = assistant(MockLlmClient::new("unused"));
        assert!(matches!(
            analyze_record(&a, &mut state, Uuid::new_v4()),
            Err(CommandError::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn remote_sample_image_fails_without_change() {
        let mut state = AppState::with_samples();
        let record = state.records().all()[0].clone();
        let a = assistant(MockLlmClient::new("unused"));
        assert!(matches!(
            analyze_record(&a, &mut state, record.id),
            Err(CommandError::Ai(_))
        ));
        assert_eq!(
            state.records().get(record.id).unwrap().description,
            record.description
        );
    }
}
