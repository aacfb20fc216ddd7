//! In-memory record collection.
//!
//! Records live for the process lifetime. New records go to the front; list
//! views sort by date, newest first. There is no delete.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{MedicalRecord, MedicationStatus, NewRecord, RecordCategory};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),
}

/// Per-category record count for the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: RecordCategory,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<MedicalRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demo records.
    pub fn with_samples() -> Self {
        Self {
            records: sample_records(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in collection order (newest insertion first).
    pub fn all(&self) -> &[MedicalRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&MedicalRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn add(&mut self, input: NewRecord) -> &MedicalRecord {
        let record = MedicalRecord::from_new(input);
        tracing::info!(
            record_id = %record.id,
            category = %record.category,
            "Record added"
        );
        self.records.insert(0, record);
        &self.records[0]
    }

    /// Replace a record's description, e.g. after photo analysis.
    pub fn update_description(
        &mut self,
        id: Uuid,
        description: String,
    ) -> Result<&MedicalRecord, StoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        record.description = description;
        tracing::debug!(record_id = %id, "Record description updated");
        Ok(record)
    }

    pub fn count_by_category(&self, category: RecordCategory) -> usize {
        self.records.iter().filter(|r| r.category == category).count()
    }

    pub fn category_counts(&self) -> Vec<CategoryCount> {
        RecordCategory::ALL
            .iter()
            .map(|&category| CategoryCount {
                category,
                label: category.label().to_string(),
                count: self.count_by_category(category),
            })
            .collect()
    }

    /// Records of one category, newest date first.
    ///
    /// `medication_tab` only applies to `RecordCategory::Medication`; a
    /// medication without status counts as past.
    pub fn list(
        &self,
        category: RecordCategory,
        medication_tab: Option<MedicationStatus>,
    ) -> Vec<&MedicalRecord> {
        let mut listed: Vec<&MedicalRecord> = self
            .records
            .iter()
            .filter(|r| r.category == category)
            .filter(|r| match (category, medication_tab) {
                (RecordCategory::Medication, Some(tab)) => r.medication_status() == Some(tab),
                _ => true,
            })
            .collect();
        // Stable: equal dates keep collection order.
        listed.sort_by(|a, b| b.date.cmp(&a.date));
        listed
    }
}

fn sample(
    category: RecordCategory,
    title: &str,
    (y, m, d): (i32, u32, u32),
    description: &str,
    image: &str,
    status: Option<MedicationStatus>,
) -> Option<MedicalRecord> {
    Some(MedicalRecord::from_new(NewRecord {
        category,
        title: title.to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d)?,
        description: description.to_string(),
        image: Some(image.to_string()),
        status,
    }))
}

/// Demo records shown on first launch.
pub fn sample_records() -> Vec<MedicalRecord> {
    use MedicationStatus::{Current, Past};
    use RecordCategory::*;

    [
        sample(
            Admission,
            "市中心医院 - 入院记录",
            (2023, 10, 15),
            "因急性肠胃炎入院，主诉腹痛伴呕吐。",
            "https://picsum.photos/400/600?random=1",
            None,
        ),
        sample(
            Admission,
            "市中心医院 - 出院小结",
            (2023, 10, 20),
            "经抗感染、补液治疗后好转，予以出院。医嘱：清淡饮食。",
            "https://picsum.photos/400/600?random=2",
            None,
        ),
        sample(
            Medication,
            "奥美拉唑肠溶胶囊",
            (2023, 10, 20),
            "【适应症】\n用于胃溃疡、十二指肠溃疡、应激性溃疡、反流性食管炎和卓-艾氏综合征（胃泌素瘤）。\n\n【用法用量】\n口服，不可咀嚼。主要是早晨空腹服用。\n\n【不良反应】\n偶见头痛、腹泻、恶心、皮疹等。",
            "https://picsum.photos/400/400?random=3",
            Some(Current),
        ),
        sample(
            Medication,
            "头孢克肟分散片",
            (2023, 10, 15),
            "每日两次，每次一片。抗生素治疗。",
            "https://picsum.photos/400/400?random=4",
            Some(Past),
        ),
        sample(
            Medication,
            "布洛芬缓释胶囊",
            (2023, 9, 1),
            "用于缓解轻至中度疼痛如头痛、关节痛、偏头痛、牙痛、肌肉痛、神经痛、痛经。也用于普通感冒或流行性感冒引起的发热。",
            "https://picsum.photos/400/400?random=7",
            Some(Past),
        ),
        sample(
            Medication,
            "维生素C泡腾片",
            (2023, 11, 1),
            "【功能主治】\n增强机体抵抗力，用于预防和治疗各种急、慢性传染性疾病或其他疾病。\n\n【用法用量】\n将泡腾片放入一杯水中，溶解后饮用。",
            "https://picsum.photos/400/400?random=8",
            Some(Current),
        ),
        sample(
            Billing,
            "住院费用总清单",
            (2023, 10, 20),
            "总计费用：3500.50元。其中医保支付2800元，自费700.50元。",
            "https://picsum.photos/400/600?random=5",
            None,
        ),
        sample(
            LabResult,
            "血常规检验报告",
            (2023, 10, 15),
            "白细胞计数(WBC) 12.5 (偏高)，中性粒细胞百分比 85% (偏高)。提示细菌感染。",
            "https://picsum.photos/400/600?random=6",
            None,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
