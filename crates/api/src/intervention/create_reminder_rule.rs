use super::subscribers::SyncRemindersOnInterventionChanged;
use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::create_reminder_rule::{APIResponse, PathParams, RequestBody};
use tapp_plus_domain::{ReminderChannel, ReminderRule, ValidationError, ID};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::InterventionNotFound(id) => TappError::NotFound(format!(
            "The intervention with id: {}, was not found.",
            id
        )),
        UseCaseErrors::InvalidRule(e) => TappError::BadClientData(e.to_string()),
    }
}

pub async fn create_reminder_rule_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let usecase = CreateReminderRuleUseCase {
        intervention_id: path_params.into_inner().intervention_id,
        offset_minutes: body.offset_minutes,
        channel: body.channel,
        enabled: body.enabled.unwrap_or(true),
    };

    execute(usecase, &ctx)
        .await
        .map(|rule| HttpResponse::Created().json(APIResponse::new(rule)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct CreateReminderRuleUseCase {
    pub intervention_id: ID,
    pub offset_minutes: i64,
    pub channel: ReminderChannel,
    pub enabled: bool,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InterventionNotFound(ID),
    InvalidRule(ValidationError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderRuleUseCase {
    type Response = ReminderRule;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let rule = ReminderRule {
            id: Default::default(),
            intervention_id: self.intervention_id.clone(),
            offset_minutes: self.offset_minutes,
            channel: self.channel,
            enabled: self.enabled,
            created: ctx.sys.get_timestamp_millis(),
        };
        rule.validate().map_err(UseCaseErrors::InvalidRule)?;

        let intervention = ctx
            .repos
            .interventions
            .find(&self.intervention_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        if intervention.is_none() {
            return Err(UseCaseErrors::InterventionNotFound(
                self.intervention_id.clone(),
            ));
        }

        ctx.repos
            .reminder_rules
            .insert(&rule)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        Ok(rule)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnInterventionChanged)]
    }
}
