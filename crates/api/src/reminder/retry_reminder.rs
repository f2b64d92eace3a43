use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::retry_reminder::{APIResponse, PathParams};
use tapp_plus_domain::{Reminder, ReminderStatus, ID};
use tapp_plus_infra::TappContext;
use tracing::info;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::NotFound(id) => {
            TappError::NotFound(format!("The reminder with id: {}, was not found.", id))
        }
        UseCaseErrors::NotFailed(status) => TappError::Conflict(format!(
            "Only failed reminders can be retried, this one is {}.",
            status.as_str()
        )),
        UseCaseErrors::InterventionClosed(id) => TappError::Conflict(format!(
            "The intervention with id: {}, is canceled or done.",
            id
        )),
    }
}

pub async fn retry_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let usecase = RetryReminderUseCase {
        reminder_id: path_params.into_inner().reminder_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(error_handler)
}

/// Gives a failed reminder a fresh attempt budget, due right away
#[derive(Debug)]
pub struct RetryReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    NotFailed(ReminderStatus),
    InterventionClosed(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RetryReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?
            .ok_or_else(|| UseCaseErrors::NotFound(self.reminder_id.clone()))?;
        if reminder.status != ReminderStatus::Failed {
            return Err(UseCaseErrors::NotFailed(reminder.status));
        }

        let intervention = ctx
            .repos
            .interventions
            .find(&reminder.intervention_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        match intervention {
            Some(intervention) if intervention.closed_reason().is_none() => (),
            _ => return Err(UseCaseErrors::InterventionClosed(reminder.intervention_id)),
        }

        let now = ctx.sys.get_timestamp_millis();
        let retried = ctx
            .repos
            .reminders
            .retry_failed(&reminder.id, now)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        if !retried {
            // Someone else retried it in the meantime
            return Err(UseCaseErrors::NotFailed(ReminderStatus::Scheduled));
        }
        info!(reminder_id = %reminder.id, "Failed reminder requeued");

        ctx.repos
            .reminders
            .find(&reminder.id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?
            .ok_or(UseCaseErrors::NotFound(reminder.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{TestContext, MINUTE};
    use tapp_plus_domain::{InterventionPriority, InterventionStatus, ReminderChannel};

    async fn failed_reminder(tc: &TestContext) -> Reminder {
        let intervention = tc
            .intervention(
                24 * 60 * MINUTE,
                InterventionPriority::Normal,
                &[(-60, ReminderChannel::Email)],
            )
            .await;
        let mut reminder = tc
            .ctx
            .repos
            .reminders
            .find_by_intervention(&intervention.id)
            .await
            .unwrap()
            .remove(0);
        let lease = tc.now() + MINUTE;
        assert!(tc
            .ctx
            .repos
            .reminders
            .claim(&reminder.id, tc.now(), lease)
            .await
            .unwrap());
        reminder.status = ReminderStatus::Failed;
        reminder.attempts = 3;
        reminder.claimed_until = None;
        reminder.last_error = Some("mailbox full".into());
        assert!(tc
            .ctx
            .repos
            .reminders
            .complete_attempt(&reminder, lease, None)
            .await
            .unwrap());
        reminder
    }

    #[actix_web::main]
    #[test]
    async fn requeues_failed_reminder() {
        let tc = TestContext::new(0).await;
        let reminder = failed_reminder(&tc).await;
        tc.sys.set(10 * MINUTE);

        let usecase = RetryReminderUseCase {
            reminder_id: reminder.id.clone(),
        };
        let res = execute(usecase, &tc.ctx).await.unwrap();
        assert_eq!(res.status, ReminderStatus::Scheduled);
        assert_eq!(res.attempts, 0);
        assert_eq!(res.planned_send_at, 10 * MINUTE);
        assert!(res.claimed_until.is_none());

        // Retrying again is a conflict as it is no longer failed
        let usecase = RetryReminderUseCase {
            reminder_id: reminder.id,
        };
        assert!(matches!(
            execute(usecase, &tc.ctx).await,
            Err(UseCaseErrors::NotFailed(ReminderStatus::Scheduled))
        ));
    }

    #[actix_web::main]
    #[test]
    async fn canceled_intervention_can_not_be_retried() {
        let tc = TestContext::new(0).await;
        let reminder = failed_reminder(&tc).await;
        let mut intervention = tc
            .ctx
            .repos
            .interventions
            .find(&reminder.intervention_id)
            .await
            .unwrap()
            .unwrap();
        intervention.status = InterventionStatus::Canceled;
        tc.ctx.repos.interventions.save(&intervention).await.unwrap();

        let usecase = RetryReminderUseCase {
            reminder_id: reminder.id,
        };
        assert!(matches!(
            execute(usecase, &tc.ctx).await,
            Err(UseCaseErrors::InterventionClosed(_))
        ));
    }

    #[actix_web::main]
    #[test]
    async fn unknown_reminder() {
        let tc = TestContext::new(0).await;
        let usecase = RetryReminderUseCase {
            reminder_id: Default::default(),
        };
        assert!(matches!(
            execute(usecase, &tc.ctx).await,
            Err(UseCaseErrors::NotFound(_))
        ));
    }
}
