use serde::{Deserialize, Serialize};

use super::enums::Gender;

/// Basic profile entered at login. Held for the session only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub gender: Gender,
    /// Free text, as typed.
    pub age: String,
}

impl UserProfile {
    pub fn new(name: &str, gender: Gender, age: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            gender,
            age: age.trim().to_string(),
        }
    }

    /// A profile can only get past login with a non-blank name.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
    }
}
