use crate::dtos::{NotificationLogDTO, ReminderDTO, ReminderStatsDTO};
use serde::{Deserialize, Serialize};
use tapp_plus_domain::{
    NotificationLog, Reminder, ReminderChannel, ReminderStats, ReminderStatus, ID,
};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod get_reminders {
    use super::*;

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub intervention_id: Option<ID>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub status: Option<ReminderStatus>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub channel: Option<ReminderChannel>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub skip: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub limit: Option<usize>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod get_reminder_stats {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub stats: ReminderStatsDTO,
    }

    impl APIResponse {
        pub fn new(stats: ReminderStats) -> Self {
            Self {
                stats: ReminderStatsDTO::new(stats),
            }
        }
    }
}

pub mod retry_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminder_logs {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub logs: Vec<NotificationLogDTO>,
    }

    impl APIResponse {
        pub fn new(logs: Vec<NotificationLog>) -> Self {
            Self {
                logs: logs.into_iter().map(NotificationLogDTO::new).collect(),
            }
        }
    }
}
