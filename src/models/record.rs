use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{MedicationStatus, RecordCategory};
use super::ModelError;

/// A single stored health record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub category: RecordCategory,
    pub title: String,
    pub date: NaiveDate,
    /// Free text; for medications this holds the package-insert summary.
    pub description: String,
    /// Data URL of a captured/uploaded photo, or a remote image URL.
    pub image: Option<String>,
    /// Only meaningful for `RecordCategory::Medication`.
    pub status: Option<MedicationStatus>,
}

/// Input for a record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub category: RecordCategory,
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub image: Option<String>,
    pub status: Option<MedicationStatus>,
}

impl MedicalRecord {
    /// Assign a fresh id. Status is dropped for non-medication categories.
    pub fn from_new(input: NewRecord) -> Self {
        let status = match input.category {
            RecordCategory::Medication => input.status,
            _ => None,
        };
        Self {
            id: Uuid::new_v4(),
            category: input.category,
            title: input.title,
            date: input.date,
            description: input.description,
            image: input.image,
            status,
        }
    }

    /// Medication status with absent treated as past. `None` for other categories.
    pub fn medication_status(&self) -> Option<MedicationStatus> {
        match self.category {
            RecordCategory::Medication => Some(self.status.unwrap_or(MedicationStatus::Past)),
            _ => None,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_record_date(raw: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ModelError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(category: RecordCategory, status: Option<MedicationStatus>) -> NewRecord {
        NewRecord {
            category,
            title: "血常规检验报告".into(),
            date: NaiveDate::from_ymd_opt(2023, 10, 15).unwrap(),
            description: String::new(),
            image: None,
            status,
        }
    }

    #[test]
    fn from_new_assigns_unique_ids() {
        let a = MedicalRecord::from_new(input(RecordCategory::LabResult, None));
        let b = MedicalRecord::from_new(input(RecordCategory::LabResult, None));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn status_dropped_outside_medication() {
        let rec = MedicalRecord::from_new(input(
            RecordCategory::Billing,
            Some(MedicationStatus::Current),
        ));
        assert_eq!(rec.status, None);
        assert_eq!(rec.medication_status(), None);
    }

    #[test]
    fn absent_medication_status_is_past() {
        let rec = MedicalRecord::from_new(input(RecordCategory::Medication, None));
        assert_eq!(rec.medication_status(), Some(MedicationStatus::Past));

        let rec = MedicalRecord::from_new(input(
            RecordCategory::Medication,
            Some(MedicationStatus::Current),
        ));
        assert_eq!(rec.medication_status(), Some(MedicationStatus::Current));
    }

    #[test]
    fn blank_image_is_not_an_image() {
        let mut rec = MedicalRecord::from_new(input(RecordCategory::Admission, None));
        assert!(!rec.has_image());
        rec.image = Some("  ".into());
        assert!(!rec.has_image());
        rec.image = Some("data:image/jpeg;base64,AAAA".into());
        assert!(rec.has_image());
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_record_date(" 2023-10-20 ").unwrap(),
            NaiveDate::from_ymd_opt(2023, 10, 20).unwrap()
        );
        assert!(matches!(
            parse_record_date("20/10/2023"),
            Err(ModelError::InvalidDate(_))
        ));
    }
}
