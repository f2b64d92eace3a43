use super::{subscribers::SyncRemindersOnInterventionChanged, InterventionWithRules};
use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::update_intervention::{APIResponse, PathParams, RequestBody};
use tapp_plus_domain::{InterventionPriority, InterventionStatus, ValidationError, ID};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::NotFound(id) => TappError::NotFound(format!(
            "The intervention with id: {}, was not found.",
            id
        )),
        UseCaseErrors::InvalidIntervention(e) => TappError::BadClientData(e.to_string()),
        UseCaseErrors::Canceled(id) => TappError::Conflict(format!(
            "The intervention with id: {}, is canceled and can not be changed.",
            id
        )),
    }
}

pub async fn update_intervention_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = UpdateInterventionUseCase {
        intervention_id: path_params.into_inner().intervention_id,
        title: body.title,
        scheduled_at: body.scheduled_at,
        priority: body.priority,
        status: body.status,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.intervention, res.rules)))
        .map_err(error_handler)
}

/// Only the given fields are changed. A new `scheduled_at` reschedules the
/// pending reminders and a closing `status` skips them.
#[derive(Debug, Default)]
pub struct UpdateInterventionUseCase {
    pub intervention_id: ID,
    pub title: Option<String>,
    pub scheduled_at: Option<i64>,
    pub priority: Option<InterventionPriority>,
    pub status: Option<InterventionStatus>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    InvalidIntervention(ValidationError),
    Canceled(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateInterventionUseCase {
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
        if intervention.status == InterventionStatus::Canceled {
            return Err(UseCaseErrors::Canceled(intervention.id));
        }

        if let Some(title) = &self.title {
            intervention.title = title.trim().to_string();
        }
        if let Some(scheduled_at) = self.scheduled_at {
            intervention.scheduled_at = scheduled_at;
        }
        if let Some(priority) = self.priority {
            intervention.priority = priority;
        }
        if let Some(status) = self.status {
            intervention.status = status;
        }
        intervention
            .validate()
            .map_err(UseCaseErrors::InvalidIntervention)?;
        intervention.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .interventions
            .save(&intervention)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
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
