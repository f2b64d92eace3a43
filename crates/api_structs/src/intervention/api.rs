use crate::dtos::{InterventionDTO, ReminderRuleDTO};
use serde::{Deserialize, Serialize};
use tapp_plus_domain::{
    Intervention, InterventionPriority, InterventionStatus, ReminderChannel, ReminderRule, ID,
};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionResponse {
    pub intervention: InterventionDTO,
    pub rules: Vec<ReminderRuleDTO>,
}

impl InterventionResponse {
    pub fn new(intervention: Intervention, rules: Vec<ReminderRule>) -> Self {
        Self {
            intervention: InterventionDTO::new(intervention),
            rules: rules.into_iter().map(ReminderRuleDTO::new).collect(),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRuleResponse {
    pub rule: ReminderRuleDTO,
}

impl ReminderRuleResponse {
    pub fn new(rule: ReminderRule) -> Self {
        Self {
            rule: ReminderRuleDTO::new(rule),
        }
    }
}

/// Offset and channel of a new `ReminderRule`
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRuleAttributes {
    pub offset_minutes: i64,
    pub channel: ReminderChannel,
    #[serde(default)]
    pub enabled: Option<bool>,
}

pub mod create_intervention {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub person_id: ID,
        pub doctor_id: ID,
        pub title: String,
        pub scheduled_at: i64,
        #[serde(default)]
        pub priority: Option<InterventionPriority>,
        #[serde(default)]
        pub rules: Option<Vec<ReminderRuleAttributes>>,
    }

    pub type APIResponse = InterventionResponse;
}

pub mod get_intervention {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub intervention_id: ID,
    }

    pub type APIResponse = InterventionResponse;
}

pub mod update_intervention {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub intervention_id: ID,
    }

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub scheduled_at: Option<i64>,
        #[serde(default)]
        pub priority: Option<InterventionPriority>,
        #[serde(default)]
        pub status: Option<InterventionStatus>,
    }

    pub type APIResponse = InterventionResponse;
}

pub mod cancel_intervention {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub intervention_id: ID,
    }

    pub type APIResponse = InterventionResponse;
}

pub mod create_reminder_rule {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub intervention_id: ID,
    }

    pub type RequestBody = ReminderRuleAttributes;

    pub type APIResponse = ReminderRuleResponse;
}

pub mod get_reminder_rules {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub intervention_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub rules: Vec<ReminderRuleDTO>,
    }

    impl APIResponse {
        pub fn new(rules: Vec<ReminderRule>) -> Self {
            Self {
                rules: rules.into_iter().map(ReminderRuleDTO::new).collect(),
            }
        }
    }
}

pub mod update_reminder_rule {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub intervention_id: ID,
        pub rule_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub enabled: bool,
    }

    pub type APIResponse = ReminderRuleResponse;
}

pub mod delete_reminder_rule {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub intervention_id: ID,
        pub rule_id: ID,
    }

    pub type APIResponse = ReminderRuleResponse;
}
