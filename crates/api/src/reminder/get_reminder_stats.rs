use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::get_reminder_stats::APIResponse;
use tapp_plus_domain::ReminderStats;
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
    }
}

pub async fn get_reminder_stats_controller(
    http_req: HttpRequest,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    execute(GetReminderStatsUseCase {}, &ctx)
        .await
        .map(|stats| HttpResponse::Ok().json(APIResponse::new(stats)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct GetReminderStatsUseCase {}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderStatsUseCase {
    type Response = ReminderStats;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .reminders
            .count_by_status()
            .await
            .map(|counts| ReminderStats::from_counts(&counts))
            .map_err(|_| UseCaseErrors::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::main]
    #[test]
    async fn empty_store_has_no_success_rate() {
        let ctx = TappContext::create_inmemory();
        let stats = execute(GetReminderStatsUseCase {}, &ctx).await.unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate, None);
    }
}
