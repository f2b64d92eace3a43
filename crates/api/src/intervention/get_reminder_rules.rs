use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::get_reminder_rules::{APIResponse, PathParams};
use tapp_plus_domain::{ReminderRule, ID};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::InterventionNotFound(id) => TappError::NotFound(format!(
            "The intervention with id: {}, was not found.",
            id
        )),
    }
}

pub async fn get_reminder_rules_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetReminderRulesUseCase {
        intervention_id: path_params.into_inner().intervention_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|rules| HttpResponse::Ok().json(APIResponse::new(rules)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct GetReminderRulesUseCase {
    pub intervention_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InterventionNotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderRulesUseCase {
    type Response = Vec<ReminderRule>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
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
            .find_by_intervention(&self.intervention_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
