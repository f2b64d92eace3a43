use crate::{
    reminder::SkipReason,
    shared::{
        entity::{Entity, ID},
        validation::{require_text, InvalidEnumValue, ValidationError},
    },
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterventionPriority {
    Urgent,
    Normal,
    Low,
}

impl InterventionPriority {
    /// Dispatch rank, lower goes first
    pub fn rank(&self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::Normal => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "URGENT",
            Self::Normal => "NORMAL",
            Self::Low => "LOW",
        }
    }
}

impl Default for InterventionPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl FromStr for InterventionPriority {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "URGENT" => Ok(Self::Urgent),
            "NORMAL" => Ok(Self::Normal),
            "LOW" => Ok(Self::Low),
            _ => Err(InvalidEnumValue::new("intervention priority", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterventionStatus {
    Planned,
    InProgress,
    Done,
    Canceled,
}

impl InterventionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
            Self::Canceled => "CANCELED",
        }
    }
}

impl Default for InterventionStatus {
    fn default() -> Self {
        Self::Planned
    }
}

impl FromStr for InterventionStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNED" => Ok(Self::Planned),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            "CANCELED" => Ok(Self::Canceled),
            _ => Err(InvalidEnumValue::new("intervention status", s)),
        }
    }
}

/// A scheduled medical visit or action for a `Person` with a `Doctor`.
///
/// The `ReminderRule`s of an `Intervention` are materialized into `Reminder`s
/// relative to `scheduled_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Intervention {
    pub id: ID,
    pub person_id: ID,
    pub doctor_id: ID,
    pub title: String,
    /// Start of the intervention in utc millis
    pub scheduled_at: i64,
    pub priority: InterventionPriority,
    pub status: InterventionStatus,
    pub created: i64,
    pub updated: i64,
}

impl Entity for Intervention {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Intervention {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.title, "title")
    }

    /// The instant a reminder with the given offset fires for this intervention
    pub fn remind_at(&self, offset_minutes: i64) -> i64 {
        self.scheduled_at + offset_minutes * 60 * 1000
    }

    pub fn is_urgent(&self) -> bool {
        self.priority == InterventionPriority::Urgent
    }

    /// Reason for skipping every pending reminder when the intervention
    /// is no longer going to happen
    pub fn closed_reason(&self) -> Option<SkipReason> {
        match self.status {
            InterventionStatus::Canceled => Some(SkipReason::Canceled),
            InterventionStatus::Done => Some(SkipReason::Completed),
            InterventionStatus::Planned | InterventionStatus::InProgress => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgent_ranks_before_normal_before_low() {
        let mut priorities = vec![
            InterventionPriority::Low,
            InterventionPriority::Urgent,
            InterventionPriority::Normal,
        ];
        priorities.sort_by_key(|p| p.rank());
        assert_eq!(
            priorities,
            vec![
                InterventionPriority::Urgent,
                InterventionPriority::Normal,
                InterventionPriority::Low
            ]
        );
    }

    #[test]
    fn parses_stored_values() {
        for status in [
            InterventionStatus::Planned,
            InterventionStatus::InProgress,
            InterventionStatus::Done,
            InterventionStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<InterventionStatus>(), Ok(status));
        }
        assert!("canceled".parse::<InterventionStatus>().is_err());
        assert_eq!(
            "URGENT".parse::<InterventionPriority>(),
            Ok(InterventionPriority::Urgent)
        );
    }
}
