pub mod enums;
pub mod profile;
pub mod record;

pub use enums::*;
pub use profile::*;
pub use record::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
}
