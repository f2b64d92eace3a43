mod log;
mod webhook;

pub use log::LogNotifier;
use tapp_plus_domain::ReminderChannel;
use thiserror::Error;
pub use webhook::WebhookNotifier;

/// Provider acknowledgement of an accepted message
#[derive(Debug, Clone, PartialEq)]
pub struct SendReceipt {
    /// Id the provider uses when reporting delivery and read receipts
    pub provider_msg_id: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifierError {
    /// The send might succeed if tried again later
    #[error("Transient notifier error: {0}")]
    Transient(String),
    #[error("Permanent notifier error: {0}")]
    Permanent(String),
}

impl NotifierError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }
}

/// Hands a rendered reminder to the email, sms or push provider.
///
/// Every attempt of the same reminder carries the same `idempotency_key`, so
/// a provider can drop a message it already accepted when an attempt ended
/// without a clear answer and is retried.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn send(
        &self,
        channel: ReminderChannel,
        recipient: &str,
        message: &str,
        idempotency_key: &str,
    ) -> Result<SendReceipt, NotifierError>;
}
