use crate::{
    reminder_rule::ReminderChannel,
    shared::{
        entity::{Entity, ID},
        validation::InvalidEnumValue,
    },
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Sent,
    Failed,
    Delivered,
    Read,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
            Self::Delivered => "DELIVERED",
            Self::Read => "READ",
        }
    }

    fn progress(&self) -> u8 {
        match self {
            Self::Failed => 0,
            Self::Sent => 1,
            Self::Delivered => 2,
            Self::Read => 3,
        }
    }
}

impl FromStr for NotificationStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SENT" => Ok(Self::Sent),
            "FAILED" => Ok(Self::Failed),
            "DELIVERED" => Ok(Self::Delivered),
            "READ" => Ok(Self::Read),
            _ => Err(InvalidEnumValue::new("notification status", s)),
        }
    }
}

/// Confirmation a provider reports back for a sent notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryReceiptStatus {
    Delivered,
    Read,
}

/// Record of a single dispatch attempt of a `Reminder`.
///
/// Logs are only ever appended. The one mutation allowed afterwards is
/// recording delivery and read receipts from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationLog {
    pub id: ID,
    pub reminder_id: ID,
    pub channel: ReminderChannel,
    /// Recipient address, missing when the person could not be reached
    /// on the channel
    pub to: Option<String>,
    pub status: NotificationStatus,
    pub provider_msg_id: Option<String>,
    pub error: Option<String>,
    pub created: i64,
    pub delivered_at: Option<i64>,
    pub read_at: Option<i64>,
}

impl Entity for NotificationLog {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl NotificationLog {
    pub fn sent(
        reminder_id: ID,
        channel: ReminderChannel,
        to: Option<String>,
        provider_msg_id: String,
        now: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            reminder_id,
            channel,
            to,
            status: NotificationStatus::Sent,
            provider_msg_id: Some(provider_msg_id),
            error: None,
            created: now,
            delivered_at: None,
            read_at: None,
        }
    }

    pub fn failed(
        reminder_id: ID,
        channel: ReminderChannel,
        to: Option<String>,
        error: String,
        now: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            reminder_id,
            channel,
            to,
            status: NotificationStatus::Failed,
            provider_msg_id: None,
            error: Some(error),
            created: now,
            delivered_at: None,
            read_at: None,
        }
    }

    /// Records a provider receipt. Timestamps are only set once and the
    /// status never moves backwards, so duplicate or out of order receipts
    /// are harmless.
    pub fn apply_receipt(&mut self, receipt: DeliveryReceiptStatus, timestamp: i64) {
        let status = match receipt {
            DeliveryReceiptStatus::Delivered => NotificationStatus::Delivered,
            DeliveryReceiptStatus::Read => NotificationStatus::Read,
        };
        if self.delivered_at.is_none() {
            self.delivered_at = Some(timestamp);
        }
        if receipt == DeliveryReceiptStatus::Read && self.read_at.is_none() {
            self.read_at = Some(timestamp);
        }
        if status.progress() > self.status.progress() {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent_log() -> NotificationLog {
        NotificationLog::sent(
            Default::default(),
            ReminderChannel::Sms,
            Some("+4712345678".into()),
            "msg-1".into(),
            100,
        )
    }

    #[test]
    fn delivery_then_read_receipts() {
        let mut log = sent_log();
        log.apply_receipt(DeliveryReceiptStatus::Delivered, 200);
        assert_eq!(log.status, NotificationStatus::Delivered);
        assert_eq!(log.delivered_at, Some(200));
        assert_eq!(log.read_at, None);

        log.apply_receipt(DeliveryReceiptStatus::Read, 300);
        assert_eq!(log.status, NotificationStatus::Read);
        assert_eq!(log.delivered_at, Some(200));
        assert_eq!(log.read_at, Some(300));
    }

    #[test]
    fn late_delivery_receipt_does_not_downgrade_read() {
        let mut log = sent_log();
        log.apply_receipt(DeliveryReceiptStatus::Read, 300);
        assert_eq!(log.delivered_at, Some(300));

        log.apply_receipt(DeliveryReceiptStatus::Delivered, 250);
        assert_eq!(log.status, NotificationStatus::Read);
        assert_eq!(log.delivered_at, Some(300));
        assert_eq!(log.read_at, Some(300));
    }
}
