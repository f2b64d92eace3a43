use crate::base::{APIResponse, BaseClient};
use reqwest::StatusCode;
use std::sync::Arc;
use tapp_plus_api_structs::*;
use tapp_plus_domain::{InterventionPriority, InterventionStatus, ReminderChannel, ID};

#[derive(Clone)]
pub struct InterventionClient {
    base: Arc<BaseClient>,
}

pub struct CreateInterventionInput {
    pub person_id: ID,
    pub doctor_id: ID,
    pub title: String,
    pub scheduled_at: i64,
    pub priority: Option<InterventionPriority>,
    pub rules: Vec<ReminderRuleAttributes>,
}

#[derive(Default)]
pub struct UpdateInterventionInput {
    pub intervention_id: ID,
    pub title: Option<String>,
    pub scheduled_at: Option<i64>,
    pub priority: Option<InterventionPriority>,
    pub status: Option<InterventionStatus>,
}

pub struct CreateReminderRuleInput {
    pub intervention_id: ID,
    pub offset_minutes: i64,
    pub channel: ReminderChannel,
}

pub struct UpdateReminderRuleInput {
    pub intervention_id: ID,
    pub rule_id: ID,
    pub enabled: bool,
}

impl InterventionClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateInterventionInput,
    ) -> APIResponse<create_intervention::APIResponse> {
        let body = create_intervention::RequestBody {
            person_id: input.person_id,
            doctor_id: input.doctor_id,
            title: input.title,
            scheduled_at: input.scheduled_at,
            priority: input.priority,
            rules: Some(input.rules),
        };
        self.base
            .post(body, "interventions".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, intervention_id: ID) -> APIResponse<get_intervention::APIResponse> {
        self.base
            .get(format!("interventions/{}", intervention_id), StatusCode::OK)
            .await
    }

    pub async fn update(
        &self,
        input: UpdateInterventionInput,
    ) -> APIResponse<update_intervention::APIResponse> {
        let body = update_intervention::RequestBody {
            title: input.title,
            scheduled_at: input.scheduled_at,
            priority: input.priority,
            status: input.status,
        };
        self.base
            .put(
                body,
                format!("interventions/{}", input.intervention_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn cancel(
        &self,
        intervention_id: ID,
    ) -> APIResponse<cancel_intervention::APIResponse> {
        self.base
            .post(
                (),
                format!("interventions/{}/cancel", intervention_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn create_rule(
        &self,
        input: CreateReminderRuleInput,
    ) -> APIResponse<create_reminder_rule::APIResponse> {
        let body = ReminderRuleAttributes {
            offset_minutes: input.offset_minutes,
            channel: input.channel,
            enabled: None,
        };
        self.base
            .post(
                body,
                format!("interventions/{}/rules", input.intervention_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get_rules(
        &self,
        intervention_id: ID,
    ) -> APIResponse<get_reminder_rules::APIResponse> {
        self.base
            .get(
                format!("interventions/{}/rules", intervention_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn update_rule(
        &self,
        input: UpdateReminderRuleInput,
    ) -> APIResponse<update_reminder_rule::APIResponse> {
        let body = update_reminder_rule::RequestBody {
            enabled: input.enabled,
        };
        self.base
            .put(
                body,
                format!(
                    "interventions/{}/rules/{}",
                    input.intervention_id, input.rule_id
                ),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete_rule(
        &self,
        intervention_id: ID,
        rule_id: ID,
    ) -> APIResponse<delete_reminder_rule::APIResponse> {
        self.base
            .delete(
                format!("interventions/{}/rules/{}", intervention_id, rule_id),
                StatusCode::OK,
            )
            .await
    }
}
