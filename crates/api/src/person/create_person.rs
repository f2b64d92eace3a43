use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::create_person::{APIResponse, RequestBody};
use tapp_plus_domain::{Person, Tz, ValidationError};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::InvalidPerson(e) => TappError::BadClientData(e.to_string()),
        UseCaseErrors::InvalidTimezone(tz) => {
            TappError::BadClientData(format!("Invalid timezone given: {:?}", tz))
        }
    }
}

pub async fn create_person_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreatePersonUseCase {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        phone: body.phone,
        push_token: body.push_token,
        timezone: body.timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|person| HttpResponse::Created().json(APIResponse::new(person)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct CreatePersonUseCase {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub push_token: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidPerson(ValidationError),
    InvalidTimezone(String),
    StorageError,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreatePersonUseCase {
    type Response = Person;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let timezone = match non_empty(&self.timezone) {
            Some(tz) => tz
                .parse::<Tz>()
                .map_err(|_| UseCaseErrors::InvalidTimezone(tz.clone()))?,
            None => Tz::UTC,
        };
        let person = Person {
            id: Default::default(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: non_empty(&self.email),
            phone: non_empty(&self.phone),
            push_token: non_empty(&self.push_token),
            timezone,
            created: ctx.sys.get_timestamp_millis(),
        };
        person.validate().map_err(UseCaseErrors::InvalidPerson)?;

        ctx.repos
            .persons
            .insert(&person)
            .await
            .map(|_| person)
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
