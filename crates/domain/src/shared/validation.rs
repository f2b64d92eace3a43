use thiserror::Error;

/// Rejected input when creating or updating an entity
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("The field `{0}` is required")]
    MissingField(&'static str),
    #[error("The email address `{0}` is not valid")]
    InvalidEmail(String),
    #[error("Reminder offset of {0} minutes is out of range")]
    InvalidReminderOffset(i64),
}

/// A stored or requested enum value that does not map to any variant
#[derive(Error, Debug, Clone, PartialEq)]
#[error("`{value}` is not a valid {kind}")]
pub struct InvalidEnumValue {
    pub kind: &'static str,
    pub value: String,
}

impl InvalidEnumValue {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}
