use super::subscribers::SyncRemindersOnInterventionChanged;
use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::delete_reminder_rule::{APIResponse, PathParams};
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

pub async fn delete_reminder_rule_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let path_params = path_params.into_inner();
    let usecase = DeleteReminderRuleUseCase {
        intervention_id: path_params.intervention_id,
        rule_id: path_params.rule_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Ok().json(APIResponse::new(rule)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct DeleteReminderRuleUseCase {
    pub intervention_id: ID,
    pub rule_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderRuleUseCase {
    type Response = ReminderRule;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        match ctx.repos.reminder_rules.find(&self.rule_id).await {
            Ok(Some(rule)) if rule.intervention_id == self.intervention_id => (),
            Ok(_) => return Err(UseCaseErrors::NotFound(self.rule_id.clone())),
            Err(_) => return Err(UseCaseErrors::StorageError),
        };

        ctx.repos
            .reminder_rules
            .delete(&self.rule_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?
            .ok_or_else(|| UseCaseErrors::NotFound(self.rule_id.clone()))
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnInterventionChanged)]
    }
}
