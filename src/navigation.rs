use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{MedicationStatus, RecordCategory, UserProfile};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    #[error("A name is required to continue")]
    EmptyName,

    #[error("Cannot {action} from the {from:?} view")]
    InvalidTransition { action: &'static str, from: View },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Home,
    CategoryList,
    RecordDetail,
    Summary,
}

/// Which screen is showing and what it is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    view: View,
    selected_category: Option<RecordCategory>,
    selected_record: Option<Uuid>,
    medication_tab: MedicationStatus,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            view: View::Login,
            selected_category: None,
            selected_record: None,
            medication_tab: MedicationStatus::Current,
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected_category(&self) -> Option<RecordCategory> {
        self.selected_category
    }

    pub fn selected_record(&self) -> Option<Uuid> {
        self.selected_record
    }

    pub fn medication_tab(&self) -> MedicationStatus {
        self.medication_tab
    }

    fn require(&self, action: &'static str, allowed: &[View]) -> Result<(), NavigationError> {
        if allowed.contains(&self.view) {
            Ok(())
        } else {
            Err(NavigationError::InvalidTransition {
                action,
                from: self.view,
            })
        }
    }

    /// Leave the login screen once the profile has a name.
    pub fn login(&mut self, profile: &UserProfile) -> Result<(), NavigationError> {
        self.require("log in", &[View::Login])?;
        if !profile.is_complete() {
            return Err(NavigationError::EmptyName);
        }
        self.view = View::Home;
        Ok(())
    }

    /// Opening the medication list always starts on the current tab.
    pub fn open_category(&mut self, category: RecordCategory) -> Result<(), NavigationError> {
        self.require("open a category", &[View::Home])?;
        self.selected_category = Some(category);
        if category == RecordCategory::Medication {
            self.medication_tab = MedicationStatus::Current;
        }
        self.view = View::CategoryList;
        Ok(())
    }

    pub fn open_record(&mut self, id: Uuid) -> Result<(), NavigationError> {
        self.require("open a record", &[View::CategoryList])?;
        self.selected_record = Some(id);
        self.view = View::RecordDetail;
        Ok(())
    }

    pub fn open_summary(&mut self) -> Result<(), NavigationError> {
        self.require("open the summary", &[View::Home])?;
        self.view = View::Summary;
        Ok(())
    }

    pub fn set_medication_tab(&mut self, tab: MedicationStatus) {
        self.medication_tab = tab;
    }

    /// Step back one level. No-op on the home and login screens.
    pub fn back(&mut self) {
        match self.view {
            View::RecordDetail => {
                self.view = View::CategoryList;
                self.selected_record = None;
            }
            View::CategoryList | View::Summary => {
                self.view = View::Home;
                self.selected_category = None;
            }
            View::Home | View::Login => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn logged_in() -> Navigator {
        let mut nav = Navigator::new();
        nav.login(&UserProfile::new("李四", Gender::Female, "35"))
            .unwrap();
        nav
    }

    #[test]
    fn starts_at_login() {
        assert_eq!(Navigator::new().view(), View::Login);
    }

    #[test]
    fn login_requires_name() {
        let mut nav = Navigator::new();
        let err = nav
            .login(&UserProfile::new("  ", Gender::Male, ""))
            .unwrap_err();
        assert_eq!(err, NavigationError::EmptyName);
        assert_eq!(nav.view(), View::Login);
    }

    #[test]
    fn category_then_record_then_back() {
        let mut nav = logged_in();
        nav.open_category(RecordCategory::LabResult).unwrap();
        let id = Uuid::new_v4();
        nav.open_record(id).unwrap();
        assert_eq!(nav.view(), View::RecordDetail);
        assert_eq!(nav.selected_record(), Some(id));

        nav.back();
        assert_eq!(nav.view(), View::CategoryList);
        assert_eq!(nav.selected_record(), None);
        assert_eq!(nav.selected_category(), Some(RecordCategory::LabResult));

        nav.back();
        assert_eq!(nav.view(), View::Home);
        assert_eq!(nav.selected_category(), None);

        nav.back();
        assert_eq!(nav.view(), View::Home);
    }

    #[test]
    fn opening_medication_resets_tab() {
        let mut nav = logged_in();
        nav.set_medication_tab(MedicationStatus::Past);
        nav.open_category(RecordCategory::Medication).unwrap();
        assert_eq!(nav.medication_tab(), MedicationStatus::Current);
    }

    #[test]
    fn summary_back_to_home() {
        let mut nav = logged_in();
        nav.open_summary().unwrap();
        assert_eq!(nav.view(), View::Summary);
        nav.back();
        assert_eq!(nav.view(), View::Home);
    }

    #[test]
    fn invalid_transitions_rejected() {
        let mut nav = Navigator::new();
        assert!(matches!(
            nav.open_summary(),
            Err(NavigationError::InvalidTransition { from: View::Login, .. })
        ));
        let mut nav = logged_in();
        assert!(nav.open_record(Uuid::new_v4()).is_err());
        assert_eq!(nav.view(), View::Home);
    }
}
