use crate::base::{APIResponse, BaseClient};
use reqwest::StatusCode;
use std::sync::Arc;
use tapp_plus_api_structs::*;
use tapp_plus_domain::{DeliveryReceiptStatus, ID};

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub type GetRemindersInput = get_reminders::QueryParams;

pub struct RecordDeliveryInput {
    pub provider_msg_id: String,
    pub status: DeliveryReceiptStatus,
    pub timestamp: Option<i64>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn get(&self, input: GetRemindersInput) -> APIResponse<get_reminders::APIResponse> {
        let mut query = Vec::new();
        if let Some(intervention_id) = input.intervention_id {
            query.push(format!("interventionId={}", intervention_id));
        }
        if let Some(status) = input.status {
            query.push(format!("status={}", status.as_str()));
        }
        if let Some(channel) = input.channel {
            query.push(format!("channel={}", channel.as_str()));
        }
        if let Some(skip) = input.skip {
            query.push(format!("skip={}", skip));
        }
        if let Some(limit) = input.limit {
            query.push(format!("limit={}", limit));
        }
        self.base
            .get(format!("reminders?{}", query.join("&")), StatusCode::OK)
            .await
    }

    pub async fn stats(&self) -> APIResponse<get_reminder_stats::APIResponse> {
        self.base
            .get("reminders/stats".into(), StatusCode::OK)
            .await
    }

    pub async fn retry(&self, reminder_id: ID) -> APIResponse<retry_reminder::APIResponse> {
        self.base
            .post(
                (),
                format!("reminders/{}/retry", reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn logs(&self, reminder_id: ID) -> APIResponse<get_reminder_logs::APIResponse> {
        self.base
            .get(format!("reminders/{}/logs", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn record_delivery(
        &self,
        input: RecordDeliveryInput,
    ) -> APIResponse<record_delivery::APIResponse> {
        let body = record_delivery::RequestBody {
            provider_msg_id: input.provider_msg_id,
            status: input.status,
            timestamp: input.timestamp,
        };
        self.base
            .post(body, "notifications/delivery".into(), StatusCode::OK)
            .await
    }
}
