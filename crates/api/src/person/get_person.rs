use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::get_person::{APIResponse, PathParams};
use tapp_plus_domain::{Person, ID};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::NotFound(id) => {
            TappError::NotFound(format!("The person with id: {}, was not found.", id))
        }
    }
}

pub async fn get_person_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetPersonUseCase {
        person_id: path_params.into_inner().person_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|person| HttpResponse::Ok().json(APIResponse::new(person)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct GetPersonUseCase {
    pub person_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetPersonUseCase {
    type Response = Person;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        match ctx.repos.persons.find(&self.person_id).await {
            Ok(Some(person)) => Ok(person),
            Ok(None) => Err(UseCaseErrors::NotFound(self.person_id.clone())),
            Err(_) => Err(UseCaseErrors::StorageError),
        }
    }
}
