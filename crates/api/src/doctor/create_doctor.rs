use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::create_doctor::{APIResponse, RequestBody};
use tapp_plus_domain::{Doctor, ValidationError};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::InvalidDoctor(e) => TappError::BadClientData(e.to_string()),
    }
}

pub async fn create_doctor_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateDoctorUseCase {
        name: body.name,
        specialty: body.specialty,
    };

    execute(usecase, &ctx)
        .await
        .map(|doctor| HttpResponse::Created().json(APIResponse::new(doctor)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct CreateDoctorUseCase {
    pub name: String,
    pub specialty: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidDoctor(ValidationError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateDoctorUseCase {
    type Response = Doctor;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let doctor = Doctor {
            id: Default::default(),
            name: self.name.trim().to_string(),
            specialty: self
                .specialty
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            created: ctx.sys.get_timestamp_millis(),
        };
        doctor.validate().map_err(UseCaseErrors::InvalidDoctor)?;

        ctx.repos
            .doctors
            .insert(&doctor)
            .await
            .map(|_| doctor)
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
