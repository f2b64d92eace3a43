use super::{subscribers::SyncRemindersOnInterventionChanged, InterventionWithRules};
use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::cancel_intervention::{APIResponse, PathParams};
use tapp_plus_domain::{InterventionStatus, ID};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::NotFound(id) => TappError::NotFound(format!(
            "The intervention with id: {}, was not found.",
            id
        )),
        UseCaseErrors::AlreadyDone(id) => TappError::Conflict(format!(
            "The intervention with id: {}, is already done.",
            id
        )),
    }
}

pub async fn cancel_intervention_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let usecase = CancelInterventionUseCase {
        intervention_id: path_params.into_inner().intervention_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.intervention, res.rules)))
        .map_err(error_handler)
}

/// Canceling twice is a no-op
#[derive(Debug)]
pub struct CancelInterventionUseCase {
    pub intervention_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    AlreadyDone(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelInterventionUseCase {
    type Response = InterventionWithRules;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let mut intervention = ctx
            .repos
            .interventions
            .find(&self.intervention_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?
            .ok_or_else(|| UseCaseErrors::NotFound(self.intervention_id.clone()))?;

        match intervention.status {
            InterventionStatus::Done => return Err(UseCaseErrors::AlreadyDone(intervention.id)),
            InterventionStatus::Canceled => (),
            InterventionStatus::Planned | InterventionStatus::InProgress => {
                intervention.status = InterventionStatus::Canceled;
                intervention.updated = ctx.sys.get_timestamp_millis();
                ctx.repos
                    .interventions
                    .save(&intervention)
                    .await
                    .map_err(|_| UseCaseErrors::StorageError)?;
            }
        }

        let rules = ctx
            .repos
            .reminder_rules
            .find_by_intervention(&intervention.id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        Ok(InterventionWithRules {
            intervention,
            rules,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnInterventionChanged)]
    }
}
