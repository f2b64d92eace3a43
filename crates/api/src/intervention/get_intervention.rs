use super::InterventionWithRules;
use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::get_intervention::{APIResponse, PathParams};
use tapp_plus_domain::ID;
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::NotFound(id) => TappError::NotFound(format!(
            "The intervention with id: {}, was not found.",
            id
        )),
    }
}

pub async fn get_intervention_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetInterventionUseCase {
        intervention_id: path_params.into_inner().intervention_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.intervention, res.rules)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct GetInterventionUseCase {
    pub intervention_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetInterventionUseCase {
    type Response = InterventionWithRules;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let intervention = ctx
            .repos
            .interventions
            .find(&self.intervention_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?
            .ok_or_else(|| UseCaseErrors::NotFound(self.intervention_id.clone()))?;
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
}
