use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::get_reminders::{APIResponse, QueryParams};
use tapp_plus_domain::Reminder;
use tapp_plus_infra::{ReminderQuery, TappContext};

/// Upper bound for the page size a client can ask for
const MAX_LIMIT: usize = 1000;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
    }
}

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let params = query_params.into_inner();
    let default_query = ReminderQuery::default();
    let usecase = GetRemindersUseCase {
        query: ReminderQuery {
            intervention_id: params.intervention_id,
            status: params.status,
            channel: params.channel,
            skip: params.skip.unwrap_or(default_query.skip),
            limit: params.limit.unwrap_or(default_query.limit).min(MAX_LIMIT),
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub query: ReminderQuery,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .reminders
            .find_by_query(&self.query)
            .await
            .map_err(|_| UseCaseErrors::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{TestContext, MINUTE};
    use tapp_plus_domain::{InterventionPriority, ReminderChannel, ReminderStatus};

    #[actix_web::main]
    #[test]
    async fn filters_reminders() {
        let tc = TestContext::new(0).await;
        let first = tc
            .intervention(
                24 * 60 * MINUTE,
                InterventionPriority::Normal,
                &[(-60, ReminderChannel::Email), (-120, ReminderChannel::Sms)],
            )
            .await;
        tc.intervention(
            24 * 60 * MINUTE,
            InterventionPriority::Normal,
            &[(-60, ReminderChannel::Email)],
        )
        .await;

        let query = |query: ReminderQuery| GetRemindersUseCase { query };

        let all = execute(query(ReminderQuery::default()), &tc.ctx)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let of_first = execute(
            query(ReminderQuery {
                intervention_id: Some(first.id.clone()),
                ..Default::default()
            }),
            &tc.ctx,
        )
        .await
        .unwrap();
        assert_eq!(of_first.len(), 2);

        let emails = execute(
            query(ReminderQuery {
                channel: Some(ReminderChannel::Email),
                status: Some(ReminderStatus::Scheduled),
                ..Default::default()
            }),
            &tc.ctx,
        )
        .await
        .unwrap();
        assert_eq!(emails.len(), 2);

        let page = execute(
            query(ReminderQuery {
                skip: 1,
                limit: 1,
                ..Default::default()
            }),
            &tc.ctx,
        )
        .await
        .unwrap();
        assert_eq!(page.len(), 1);
    }
}
