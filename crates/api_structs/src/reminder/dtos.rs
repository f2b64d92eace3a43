use serde::{Deserialize, Serialize};
use tapp_plus_domain::{
    NotificationLog, NotificationStatus, Reminder, ReminderChannel, ReminderStats,
    ReminderStatus, ID,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub intervention_id: ID,
    pub rule_id: ID,
    pub channel: ReminderChannel,
    pub offset_minutes: i64,
    pub remind_at: i64,
    pub planned_send_at: i64,
    pub status: ReminderStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub idempotency_key: String,
    pub sent_at: Option<i64>,
    pub claimed_until: Option<i64>,
    pub created: i64,
    pub updated: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            intervention_id: reminder.intervention_id,
            rule_id: reminder.rule_id,
            channel: reminder.channel,
            offset_minutes: reminder.offset_minutes,
            remind_at: reminder.remind_at,
            planned_send_at: reminder.planned_send_at,
            status: reminder.status,
            attempts: reminder.attempts,
            last_error: reminder.last_error,
            idempotency_key: reminder.idempotency_key,
            sent_at: reminder.sent_at,
            claimed_until: reminder.claimed_until,
            created: reminder.created,
            updated: reminder.updated,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLogDTO {
    pub id: ID,
    pub reminder_id: ID,
    pub channel: ReminderChannel,
    pub to: Option<String>,
    pub status: NotificationStatus,
    pub provider_msg_id: Option<String>,
    pub error: Option<String>,
    pub created: i64,
    pub delivered_at: Option<i64>,
    pub read_at: Option<i64>,
}

impl NotificationLogDTO {
    pub fn new(log: NotificationLog) -> Self {
        Self {
            id: log.id,
            reminder_id: log.reminder_id,
            channel: log.channel,
            to: log.to,
            status: log.status,
            provider_msg_id: log.provider_msg_id,
            error: log.error,
            created: log.created,
            delivered_at: log.delivered_at,
            read_at: log.read_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStatsDTO {
    pub total: i64,
    pub sent: i64,
    pub failed: i64,
    pub scheduled: i64,
    pub skipped: i64,
    /// `null` until at least one reminder was sent or failed
    pub success_rate: Option<f64>,
}

impl ReminderStatsDTO {
    pub fn new(stats: ReminderStats) -> Self {
        Self {
            total: stats.total,
            sent: stats.sent,
            failed: stats.failed,
            scheduled: stats.scheduled,
            skipped: stats.skipped,
            success_rate: stats.success_rate,
        }
    }
}
