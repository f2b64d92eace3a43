use super::subscribers::SyncRemindersOnInterventionChanged;
use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::update_reminder_rule::{APIResponse, PathParams, RequestBody};
use tapp_plus_domain::{ReminderRule, ID};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::NotFound(id) => TappError::NotFound(format!(
            "The reminder rule with id: {}, was not found.",
            id
        )),
    }
}

pub async fn update_reminder_rule_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let path_params = path_params.into_inner();
    let usecase = UpdateReminderRuleUseCase {
        intervention_id: path_params.intervention_id,
        rule_id: path_params.rule_id,
        enabled: body.enabled,
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Ok().json(APIResponse::new(rule)))
        .map_err(error_handler)
}

/// Enables or disables a rule. Disabling skips its pending reminders and
/// enabling materializes them again.
#[derive(Debug)]
pub struct UpdateReminderRuleUseCase {
    pub intervention_id: ID,
    pub rule_id: ID,
    pub enabled: bool,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderRuleUseCase {
    type Response = ReminderRule;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let mut rule = match ctx.repos.reminder_rules.find(&self.rule_id).await {
            Ok(Some(rule)) if rule.intervention_id == self.intervention_id => rule,
            Ok(_) => return Err(UseCaseErrors::NotFound(self.rule_id.clone())),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };
        if rule.enabled == self.enabled {
            return Ok(rule);
        }

        rule.enabled = self.enabled;
        ctx.repos
            .reminder_rules
            .save(&rule)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        Ok(rule)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnInterventionChanged)]
    }
}
