use crate::{
    intervention::Intervention,
    reminder_rule::{ReminderChannel, ReminderRule},
    shared::{
        entity::{Entity, ID},
        validation::InvalidEnumValue,
    },
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Namespace of the v5 uuids used as `Reminder` idempotency keys
const IDEMPOTENCY_KEY_NAMESPACE: Uuid = Uuid::from_u128(0x6f1e_3c2a_8d4b_4e57_9a0c_2b7d_51e4_a9f3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderStatus {
    Scheduled,
    Sent,
    Skipped,
    Failed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Sent => "SENT",
            Self::Skipped => "SKIPPED",
            Self::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Scheduled)
    }
}

impl FromStr for ReminderStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(Self::Scheduled),
            "SENT" => Ok(Self::Sent),
            "SKIPPED" => Ok(Self::Skipped),
            "FAILED" => Ok(Self::Failed),
            _ => Err(InvalidEnumValue::new("reminder status", s)),
        }
    }
}

/// Why a `Reminder` was skipped, stored in `last_error`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Rescheduled,
    Canceled,
    Completed,
    RuleDisabled,
    RuleRemoved,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rescheduled => "rescheduled",
            Self::Canceled => "canceled",
            Self::Completed => "completed",
            Self::RuleDisabled => "rule disabled",
            Self::RuleRemoved => "rule removed",
        }
    }
}

/// A `Reminder` is a concrete, time bound instance of a `ReminderRule`
/// for an `Intervention`, tracked until it reaches a terminal status.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub intervention_id: ID,
    pub rule_id: ID,
    pub channel: ReminderChannel,
    /// Offset of the rule this reminder was materialized from
    pub offset_minutes: i64,
    /// The instant computed from the intervention start and the rule offset.
    /// Never changes after creation.
    pub remind_at: i64,
    /// When the next send attempt is due. Starts at `remind_at` and is
    /// pushed forward by the retry backoff.
    pub planned_send_at: i64,
    pub status: ReminderStatus,
    /// Number of send attempts made so far
    pub attempts: i32,
    pub last_error: Option<String>,
    /// Deterministic key from (intervention, rule, remind_at). Unique among
    /// reminders that are not skipped, which is what keeps re-materialization
    /// from ever creating a second send.
    pub idempotency_key: String,
    pub sent_at: Option<i64>,
    /// Lease of the worker currently dispatching this reminder. A scheduled
    /// reminder with a lease in the future is in flight.
    pub claimed_until: Option<i64>,
    pub created: i64,
    pub updated: i64,
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Reminder {
    pub fn new(intervention: &Intervention, rule: &ReminderRule, now: i64) -> Self {
        let remind_at = intervention.remind_at(rule.offset_minutes);
        Self {
            id: Default::default(),
            intervention_id: intervention.id.clone(),
            rule_id: rule.id.clone(),
            channel: rule.channel,
            offset_minutes: rule.offset_minutes,
            remind_at,
            planned_send_at: remind_at,
            status: ReminderStatus::Scheduled,
            attempts: 0,
            last_error: None,
            idempotency_key: Self::idempotency_key(&intervention.id, &rule.id, remind_at),
            sent_at: None,
            claimed_until: None,
            created: now,
            updated: now,
        }
    }

    pub fn idempotency_key(intervention_id: &ID, rule_id: &ID, remind_at: i64) -> String {
        let name = format!("{}:{}:{}", intervention_id, rule_id, remind_at);
        Uuid::new_v5(&IDEMPOTENCY_KEY_NAMESPACE, name.as_bytes()).to_string()
    }

    pub fn is_in_flight(&self, now: i64) -> bool {
        self.status == ReminderStatus::Scheduled
            && self.claimed_until.map(|lease| lease > now).unwrap_or(false)
    }

    /// Scheduled and not claimed by any worker
    pub fn is_pending(&self, now: i64) -> bool {
        self.status == ReminderStatus::Scheduled && !self.is_in_flight(now)
    }

    pub fn is_due(&self, now: i64) -> bool {
        self.is_pending(now) && self.planned_send_at <= now
    }

    /// Whether this reminder still matches the intervention start it was
    /// materialized for
    pub fn is_stale(&self, intervention: &Intervention) -> bool {
        intervention.remind_at(self.offset_minutes) != self.remind_at
    }

    pub fn skip(&mut self, reason: SkipReason, now: i64) {
        self.status = ReminderStatus::Skipped;
        self.last_error = Some(reason.as_str().to_string());
        self.claimed_until = None;
        self.updated = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervention::{InterventionPriority, InterventionStatus};

    fn intervention_factory() -> Intervention {
        Intervention {
            id: Default::default(),
            person_id: Default::default(),
            doctor_id: Default::default(),
            title: "Dental check".into(),
            scheduled_at: 1000 * 60 * 60 * 24,
            priority: InterventionPriority::Normal,
            status: InterventionStatus::Planned,
            created: 0,
            updated: 0,
        }
    }

    fn rule_factory(intervention: &Intervention, offset_minutes: i64) -> ReminderRule {
        ReminderRule {
            id: Default::default(),
            intervention_id: intervention.id.clone(),
            offset_minutes,
            channel: ReminderChannel::Email,
            enabled: true,
            created: 0,
        }
    }

    #[test]
    fn idempotency_key_is_deterministic() {
        let intervention = intervention_factory();
        let rule = rule_factory(&intervention, -60);
        let r1 = Reminder::new(&intervention, &rule, 0);
        let r2 = Reminder::new(&intervention, &rule, 500);
        assert_ne!(r1.id, r2.id);
        assert_eq!(r1.idempotency_key, r2.idempotency_key);

        let mut moved = intervention.clone();
        moved.scheduled_at += 1000 * 60;
        let r3 = Reminder::new(&moved, &rule, 0);
        assert_ne!(r1.idempotency_key, r3.idempotency_key);

        let other_rule = rule_factory(&intervention, -60);
        let r4 = Reminder::new(&intervention, &other_rule, 0);
        assert_ne!(r1.idempotency_key, r4.idempotency_key);
    }

    #[test]
    fn computes_send_time_from_offset() {
        let intervention = intervention_factory();
        let rule = rule_factory(&intervention, -90);
        let reminder = Reminder::new(&intervention, &rule, 0);
        assert_eq!(
            reminder.remind_at,
            intervention.scheduled_at - 90 * 60 * 1000
        );
        assert_eq!(reminder.planned_send_at, reminder.remind_at);
        assert_eq!(reminder.status, ReminderStatus::Scheduled);
        assert!(!reminder.is_stale(&intervention));
    }

    #[test]
    fn claim_lease_marks_reminder_in_flight() {
        let intervention = intervention_factory();
        let rule = rule_factory(&intervention, 0);
        let mut reminder = Reminder::new(&intervention, &rule, 0);
        let now = reminder.planned_send_at;
        assert!(reminder.is_due(now));
        assert!(!reminder.is_due(now - 1));

        reminder.claimed_until = Some(now + 10);
        assert!(reminder.is_in_flight(now));
        assert!(!reminder.is_due(now));
        // An expired lease makes the reminder due again
        assert!(reminder.is_due(now + 10));

        reminder.skip(SkipReason::Canceled, now);
        assert!(!reminder.is_in_flight(now));
        assert!(!reminder.is_due(now + 10));
        assert_eq!(reminder.last_error.as_deref(), Some("canceled"));
    }
}
