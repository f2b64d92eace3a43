use crate::dtos::NotificationLogDTO;
use serde::{Deserialize, Serialize};
use tapp_plus_domain::{DeliveryReceiptStatus, NotificationLog};

pub mod record_delivery {
    use super::*;

    /// Delivery or read receipt reported by a notification provider
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub provider_msg_id: String,
        pub status: DeliveryReceiptStatus,
        /// When the provider observed the receipt, defaults to now
        #[serde(default)]
        pub timestamp: Option<i64>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub log: NotificationLogDTO,
    }

    impl APIResponse {
        pub fn new(log: NotificationLog) -> Self {
            Self {
                log: NotificationLogDTO::new(log),
            }
        }
    }
}
