//! Application state: the single owner of the session profile, the record
//! collection, navigation and the add-record form.
//!
//! Mutation goes through the methods here (`login`, `add_record`,
//! `update_description`) so every change has one entry point.

use uuid::Uuid;

use crate::form::NewRecordForm;
use crate::models::{MedicalRecord, NewRecord, UserProfile};
use crate::navigation::{NavigationError, Navigator};
use crate::records::{RecordStore, StoreError};

#[derive(Debug, Default)]
pub struct AppState {
    profile: Option<UserProfile>,
    records: RecordStore,
    navigator: Navigator,
    pub form: NewRecordForm,
}

impl AppState {
    pub fn new(records: RecordStore) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// State seeded with the demo records.
    pub fn with_samples() -> Self {
        Self::new(RecordStore::with_samples())
    }

    // ── Session ──────────────────────────────

    pub fn login(&mut self, profile: UserProfile) -> Result<(), NavigationError> {
        self.navigator.login(&profile)?;
        tracing::info!(record_count = self.records.len(), "Session started");
        self.profile = Some(profile);
        Ok(())
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    // ── Records ──────────────────────────────

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn add_record(&mut self, input: NewRecord) -> &MedicalRecord {
        self.records.add(input)
    }

    pub fn update_description(
        &mut self,
        id: Uuid,
        description: String,
    ) -> Result<&MedicalRecord, StoreError> {
        self.records.update_description(id, description)
    }

    // ── Navigation ───────────────────────────

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// The record open in the detail view, if any.
    pub fn selected_record(&self) -> Option<&MedicalRecord> {
        self.navigator
            .selected_record()
            .and_then(|id| self.records.get(id))
    }

    /// Records for the open category list, honoring the medication tab.
    pub fn visible_records(&self) -> Vec<&MedicalRecord> {
        match self.navigator.selected_category() {
            Some(category) => self
                .records
                .list(category, Some(self.navigator.medication_tab())),
            None => Vec::new(),
        }
    }
}
