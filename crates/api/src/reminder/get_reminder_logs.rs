use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::get_reminder_logs::{APIResponse, PathParams};
use tapp_plus_domain::{NotificationLog, ID};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::NotFound(id) => {
            TappError::NotFound(format!("The reminder with id: {}, was not found.", id))
        }
    }
}

pub async fn get_reminder_logs_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let usecase = GetReminderLogsUseCase {
        reminder_id: path_params.into_inner().reminder_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|logs| HttpResponse::Ok().json(APIResponse::new(logs)))
        .map_err(error_handler)
}

/// Every dispatch attempt of a reminder, oldest first
#[derive(Debug)]
pub struct GetReminderLogsUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderLogsUseCase {
    type Response = Vec<NotificationLog>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        if reminder.is_none() {
            return Err(UseCaseErrors::NotFound(self.reminder_id.clone()));
        }

        let mut logs = ctx
            .repos
            .notification_logs
            .find_by_reminder(&self.reminder_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        logs.sort_by_key(|log| log.created);
        Ok(logs)
    }
}
