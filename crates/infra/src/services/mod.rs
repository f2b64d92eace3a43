mod notifier;

pub use notifier::{INotifier, LogNotifier, NotifierError, SendReceipt, WebhookNotifier};
