use crate::{
    notification_log::NotificationLog,
    reminder::{Reminder, ReminderStatus},
    retry_policy::RetryPolicy,
};
use serde::Serialize;

/// Result of handing a `Reminder` to the notifier
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Sent { provider_msg_id: String },
    Failed { error: String, permanent: bool },
}

/// The updated `Reminder` and the `NotificationLog` to append for one attempt.
/// Both have to be stored together.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub reminder: Reminder,
    pub log: NotificationLog,
}

impl AttemptRecord {
    pub fn requeued(&self) -> bool {
        self.reminder.status == ReminderStatus::Scheduled
    }
}

/// Applies the outcome of a send attempt to a claimed `Reminder`.
///
/// A transient failure requeues the reminder with the backoff of the policy
/// as long as the attempt budget is not spent, everything else is final.
pub fn apply_attempt(
    reminder: &Reminder,
    to: Option<&str>,
    outcome: AttemptOutcome,
    policy: &RetryPolicy,
    now: i64,
) -> AttemptRecord {
    let mut reminder = reminder.clone();
    reminder.attempts += 1;
    reminder.claimed_until = None;
    reminder.updated = now;
    let to = to.map(String::from);

    let log = match outcome {
        AttemptOutcome::Sent { provider_msg_id } => {
            reminder.status = ReminderStatus::Sent;
            reminder.sent_at = Some(now);
            reminder.last_error = None;
            NotificationLog::sent(
                reminder.id.clone(),
                reminder.channel,
                to,
                provider_msg_id,
                now,
            )
        }
        AttemptOutcome::Failed { error, permanent } => {
            if !permanent && policy.can_retry(reminder.attempts) {
                reminder.status = ReminderStatus::Scheduled;
                reminder.planned_send_at = now + policy.delay_millis(reminder.attempts);
            } else {
                reminder.status = ReminderStatus::Failed;
            }
            reminder.last_error = Some(error.clone());
            NotificationLog::failed(reminder.id.clone(), reminder.channel, to, error, now)
        }
    };

    AttemptRecord { reminder, log }
}

/// Aggregate counters over all reminders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStats {
    pub total: i64,
    pub sent: i64,
    pub failed: i64,
    pub scheduled: i64,
    pub skipped: i64,
    /// `sent / (sent + failed)`, absent while nothing was attempted to the end
    pub success_rate: Option<f64>,
}

impl ReminderStats {
    pub fn from_counts(counts: &[(ReminderStatus, i64)]) -> Self {
        let mut stats = Self::default();
        for (status, count) in counts {
            match status {
                ReminderStatus::Scheduled => stats.scheduled += count,
                ReminderStatus::Sent => stats.sent += count,
                ReminderStatus::Skipped => stats.skipped += count,
                ReminderStatus::Failed => stats.failed += count,
            }
            stats.total += count;
        }
        let finished = stats.sent + stats.failed;
        if finished > 0 {
            stats.success_rate = Some(stats.sent as f64 / finished as f64);
        }
        stats
    }
}
