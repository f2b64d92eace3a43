use serde::{Deserialize, Serialize};
use tapp_plus_domain::{
    Intervention, InterventionPriority, InterventionStatus, ReminderChannel, ReminderRule, ID,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InterventionDTO {
    pub id: ID,
    pub person_id: ID,
    pub doctor_id: ID,
    pub title: String,
    pub scheduled_at: i64,
    pub priority: InterventionPriority,
    pub status: InterventionStatus,
    pub created: i64,
    pub updated: i64,
}

impl InterventionDTO {
    pub fn new(intervention: Intervention) -> Self {
        Self {
            id: intervention.id,
            person_id: intervention.person_id,
            doctor_id: intervention.doctor_id,
            title: intervention.title,
            scheduled_at: intervention.scheduled_at,
            priority: intervention.priority,
            status: intervention.status,
            created: intervention.created,
            updated: intervention.updated,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRuleDTO {
    pub id: ID,
    pub intervention_id: ID,
    pub offset_minutes: i64,
    pub channel: ReminderChannel,
    pub enabled: bool,
    pub created: i64,
}

impl ReminderRuleDTO {
    pub fn new(rule: ReminderRule) -> Self {
        Self {
            id: rule.id,
            intervention_id: rule.intervention_id,
            offset_minutes: rule.offset_minutes,
            channel: rule.channel,
            enabled: rule.enabled,
            created: rule.created,
        }
    }
}
