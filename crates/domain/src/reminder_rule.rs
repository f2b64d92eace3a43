use crate::shared::{
    entity::{Entity, ID},
    validation::{InvalidEnumValue, ValidationError},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Reminder offsets are limited to 60 days before or after the intervention
pub const MAX_REMINDER_OFFSET_MINUTES: i64 = 60 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderChannel {
    Email,
    Sms,
    Push,
}

impl ReminderChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
            Self::Push => "PUSH",
        }
    }
}

impl Display for ReminderChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderChannel {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMAIL" => Ok(Self::Email),
            "SMS" => Ok(Self::Sms),
            "PUSH" => Ok(Self::Push),
            _ => Err(InvalidEnumValue::new("reminder channel", s)),
        }
    }
}

/// A `ReminderRule` is the template saying when (relative to the
/// `Intervention` start) and how a `Person` should be reminded.
///
/// Only `enabled` can change after creation, a different offset or
/// channel is a different rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRule {
    pub id: ID,
    pub intervention_id: ID,
    /// Signed offset in minutes, negative means before the intervention
    pub offset_minutes: i64,
    pub channel: ReminderChannel,
    pub enabled: bool,
    pub created: i64,
}

impl Entity for ReminderRule {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl ReminderRule {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.offset_minutes.abs() > MAX_REMINDER_OFFSET_MINUTES {
            return Err(ValidationError::InvalidReminderOffset(self.offset_minutes));
        }
        Ok(())
    }

    /// An at-time notice, sent when the intervention starts
    pub fn is_immediate(&self) -> bool {
        self.offset_minutes == 0
    }
}
