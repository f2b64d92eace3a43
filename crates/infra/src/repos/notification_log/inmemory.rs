use super::INotificationLogRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::{Arc, Mutex};
use tapp_plus_domain::{DeliveryReceiptStatus, NotificationLog, ID};

pub struct InMemoryNotificationLogRepo {
    logs: Arc<Mutex<Vec<NotificationLog>>>,
}

impl InMemoryNotificationLogRepo {
    pub fn new(logs: Arc<Mutex<Vec<NotificationLog>>>) -> Self {
        Self { logs }
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for InMemoryNotificationLogRepo {
    async fn find_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<Vec<NotificationLog>> {
        let mut logs = find_by(&*self.logs, |log| log.reminder_id == *reminder_id);
        logs.sort_by_key(|log| log.created);
        Ok(logs)
    }

    async fn find_by_provider_msg_id(
        &self,
        provider_msg_id: &str,
    ) -> anyhow::Result<Option<NotificationLog>> {
        Ok(find_by(&*self.logs, |log| {
            log.provider_msg_id.as_deref() == Some(provider_msg_id)
        })
        .into_iter()
        .next())
    }

    async fn record_receipt(
        &self,
        provider_msg_id: &str,
        receipt: DeliveryReceiptStatus,
        timestamp: i64,
    ) -> anyhow::Result<Option<NotificationLog>> {
        let mut logs = lock(&*self.logs);
        let log = logs
            .iter_mut()
            .find(|log| log.provider_msg_id.as_deref() == Some(provider_msg_id));
        Ok(log.map(|log| {
            log.apply_receipt(receipt, timestamp);
            log.clone()
        }))
    }
}
