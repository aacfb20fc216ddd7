use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{MedicationStatus, NewRecord, RecordCategory};
use crate::pipeline::structuring::MedicationIdentification;

/// Title used when the user saves without typing one.
pub const UNTITLED_RECORD: &str = "未命名记录";

/// State of the "add record" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecordForm {
    pub category: RecordCategory,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Data URL of the attached photo.
    pub image: Option<String>,
    /// Used only when `category` is medication.
    pub status: MedicationStatus,
}

impl Default for NewRecordForm {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

impl NewRecordForm {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            category: RecordCategory::Admission,
            title: String::new(),
            description: String::new(),
            date,
            image: None,
            status: MedicationStatus::Current,
        }
    }

    /// Preset for scanning a medication package with the camera.
    pub fn quick_scan(&mut self) {
        self.category = RecordCategory::Medication;
        self.status = MedicationStatus::Current;
    }

    pub fn attach_image(&mut self, data_url: String) {
        self.image = Some(data_url);
    }

    pub fn apply_identification(&mut self, identification: MedicationIdentification) {
        self.title = identification.name;
        self.description = identification.description;
    }

    /// Build the record and clear the per-record inputs.
    /// Category and date are kept for the next entry.
    pub fn submit(&mut self) -> NewRecord {
        let title = match self.title.trim() {
            "" => UNTITLED_RECORD.to_string(),
            t => t.to_string(),
        };
        let record = NewRecord {
            category: self.category,
            title,
            date: self.date,
            description: std::mem::take(&mut self.description),
            image: self.image.take(),
            status: (self.category == RecordCategory::Medication).then_some(self.status),
        };
        self.title.clear();
        self.status = MedicationStatus::Current;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewRecordForm {
        NewRecordForm::for_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
    }

    #[test]
    fn defaults() {
        let f = form();
        assert_eq!(f.category, RecordCategory::Admission);
        assert_eq!(f.status, MedicationStatus::Current);
        assert!(f.title.is_empty());
        assert!(f.image.is_none());
    }

    #[test]
    fn default_date_is_today() {
        assert_eq!(NewRecordForm::default().date, Local::now().date_naive());
    }

    #[test]
    fn quick_scan_presets_medication() {
        let mut f = form();
        f.status = MedicationStatus::Past;
        f.quick_scan();
        assert_eq!(f.category, RecordCategory::Medication);
        assert_eq!(f.status, MedicationStatus::Current);
    }

    #[test]
    fn empty_title_gets_placeholder() {
        let mut f = form();
        f.title = "   ".into();
        assert_eq!(f.submit().title, UNTITLED_RECORD);
    }

    #[test]
    fn status_only_for_medication() {
        let mut f = form();
        f.status = MedicationStatus::Past;
        assert_eq!(f.submit().status, None);

        let mut f = form();
        f.quick_scan();
        f.status = MedicationStatus::Past;
        assert_eq!(f.submit().status, Some(MedicationStatus::Past));
    }

    #[test]
    fn submit_resets_inputs_but_keeps_category_and_date() {
        let mut f = form();
        f.quick_scan();
        f.title = "布洛芬".into();
        f.description = "止痛".into();
        f.status = MedicationStatus::Past;
        f.attach_image("data:image/jpeg;base64,QUJD".into());

        let record = f.submit();
        assert_eq!(record.title, "布洛芬");
        assert_eq!(record.image.as_deref(), Some("data:image/jpeg;base64,QUJD"));

        assert!(f.title.is_empty());
        assert!(f.description.is_empty());
        assert!(f.image.is_none());
        assert_eq!(f.status, MedicationStatus::Current);
        assert_eq!(f.category, RecordCategory::Medication);
        assert_eq!(f.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn identification_fills_title_and_description() {
        let mut f = form();
        f.apply_identification(MedicationIdentification {
            name: "阿莫西林胶囊".into(),
            description: "【用法用量】口服".into(),
        });
        assert_eq!(f.title, "阿莫西林胶囊");
        assert_eq!(f.description, "【用法用量】口服");
    }
}
