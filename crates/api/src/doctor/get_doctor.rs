use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::get_doctor::{APIResponse, PathParams};
use tapp_plus_domain::{Doctor, ID};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::NotFound(id) => {
            TappError::NotFound(format!("The doctor with id: {}, was not found.", id))
        }
    }
}

pub async fn get_doctor_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetDoctorUseCase {
        doctor_id: path_params.into_inner().doctor_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|doctor| HttpResponse::Ok().json(APIResponse::new(doctor)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct GetDoctorUseCase {
    pub doctor_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetDoctorUseCase {
    type Response = Doctor;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        match ctx.repos.doctors.find(&self.doctor_id).await {
            Ok(Some(doctor)) => Ok(doctor),
            Ok(None) => Err(UseCaseErrors::NotFound(self.doctor_id.clone())),
            Err(_) => Err(UseCaseErrors::StorageError),
        }
    }
}
