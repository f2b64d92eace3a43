use super::{INotifier, NotifierError, SendReceipt};
use tapp_plus_domain::{ReminderChannel, ID};
use tracing::info;

/// Notifier for local development, it only logs what would have been sent
pub struct LogNotifier {}

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn send(
        &self,
        channel: ReminderChannel,
        recipient: &str,
        message: &str,
        idempotency_key: &str,
    ) -> Result<SendReceipt, NotifierError> {
        let provider_msg_id = format!("log-{}", ID::new());
        info!(
            channel = channel.as_str(),
            recipient,
            message,
            idempotency_key,
            provider_msg_id = provider_msg_id.as_str(),
            "Reminder notification"
        );
        Ok(SendReceipt { provider_msg_id })
    }
}
