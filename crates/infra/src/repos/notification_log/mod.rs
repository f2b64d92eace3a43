mod inmemory;
mod postgres;

pub use inmemory::InMemoryNotificationLogRepo;
pub use postgres::PostgresNotificationLogRepo;
use tapp_plus_domain::{DeliveryReceiptStatus, NotificationLog, ID};

/// Logs are appended by `IReminderRepo::complete_attempt`, this repo only reads
/// them and records delivery receipts.
#[async_trait::async_trait]
pub trait INotificationLogRepo: Send + Sync {
    async fn find_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<Vec<NotificationLog>>;
    async fn find_by_provider_msg_id(
        &self,
        provider_msg_id: &str,
    ) -> anyhow::Result<Option<NotificationLog>>;
    /// Merges a provider receipt into the log with the given provider message id
    /// in a single store update, so concurrent receipts never overwrite each
    /// other. Returns the updated log, or `None` when no log has that id.
    async fn record_receipt(
        &self,
        provider_msg_id: &str,
        receipt: DeliveryReceiptStatus,
        timestamp: i64,
    ) -> anyhow::Result<Option<NotificationLog>>;
}
