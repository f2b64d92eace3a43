mod dispatch;
mod doctor;
mod intervention;
mod materializer;
mod notification_log;
mod person;
mod reminder;
mod reminder_rule;
mod retry_policy;
mod shared;
mod status_tracker;

pub use chrono_tz::Tz;
pub use dispatch::{order_due_reminders, render_message};
pub use doctor::Doctor;
pub use intervention::{Intervention, InterventionPriority, InterventionStatus};
pub use materializer::{materialize, MaterializationPlan};
pub use notification_log::{DeliveryReceiptStatus, NotificationLog, NotificationStatus};
pub use person::Person;
pub use reminder::{Reminder, ReminderStatus, SkipReason};
pub use reminder_rule::{ReminderChannel, ReminderRule, MAX_REMINDER_OFFSET_MINUTES};
pub use retry_policy::{InvalidRetryPolicy, RetryPolicy};
pub use shared::entity::{Entity, ID};
pub use shared::validation::{InvalidEnumValue, ValidationError};
pub use status_tracker::{apply_attempt, AttemptOutcome, AttemptRecord, ReminderStats};
