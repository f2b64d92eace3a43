use crate::shared::usecase::UseCase;
use tapp_plus_domain::{materialize, Intervention, ID};
use tapp_plus_infra::TappContext;
use tracing::info;

#[derive(Debug)]
pub enum SyncInterventionRemindersTrigger {
    /// An intervention or one of its rules was changed
    InterventionModified(ID),
    /// Periodic pass over every upcoming intervention, catching up on changes
    /// whose synchronization failed
    JobScheduler,
}

/// Brings the stored `Reminder`s of interventions in line with their
/// current schedule, status and `ReminderRule`s
#[derive(Debug)]
pub struct SyncInterventionRemindersUseCase {
    pub request: SyncInterventionRemindersTrigger,
}

#[derive(Debug, Default, PartialEq)]
pub struct SyncSummary {
    pub created: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InterventionNotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SyncInterventionRemindersUseCase {
    type Response = SyncSummary;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        match &self.request {
            SyncInterventionRemindersTrigger::InterventionModified(intervention_id) => {
                let intervention = ctx
                    .repos
                    .interventions
                    .find(intervention_id)
                    .await
                    .map_err(|_| UseCaseErrors::StorageError)?
                    .ok_or_else(|| UseCaseErrors::InterventionNotFound(intervention_id.clone()))?;
                sync_intervention(ctx, &intervention, now).await
            }
            SyncInterventionRemindersTrigger::JobScheduler => {
                let interventions = ctx
                    .repos
                    .interventions
                    .find_upcoming(now)
                    .await
                    .map_err(|_| UseCaseErrors::StorageError)?;
                let mut summary = SyncSummary::default();
                for intervention in &interventions {
                    let synced = sync_intervention(ctx, intervention, now).await?;
                    summary.created += synced.created;
                    summary.skipped += synced.skipped;
                }
                if summary != SyncSummary::default() {
                    info!(
                        interventions = interventions.len(),
                        created = summary.created,
                        skipped = summary.skipped,
                        "Reconciled reminders of upcoming interventions"
                    );
                }
                Ok(summary)
            }
        }
    }
}

async fn sync_intervention(
    ctx: &TappContext,
    intervention: &Intervention,
    now: i64,
) -> Result<SyncSummary, UseCaseErrors> {
    let rules = ctx
        .repos
        .reminder_rules
        .find_by_intervention(&intervention.id)
        .await
        .map_err(|_| UseCaseErrors::StorageError)?;
    let existing = ctx
        .repos
        .reminders
        .find_by_intervention(&intervention.id)
        .await
        .map_err(|_| UseCaseErrors::StorageError)?;

    let plan = materialize(intervention, &rules, &existing, now);
    if plan.is_empty() {
        return Ok(SyncSummary::default());
    }

    // Skip first so that a rescheduled reminder releases its key
    let skipped = ctx
        .repos
        .reminders
        .skip_unclaimed(&plan.skip, now)
        .await
        .map_err(|_| UseCaseErrors::StorageError)?;
    let created = ctx
        .repos
        .reminders
        .bulk_insert(&plan.create)
        .await
        .map_err(|_| UseCaseErrors::StorageError)?;

    info!(
        intervention_id = %intervention.id,
        created, skipped, "Synchronized intervention reminders"
    );
    Ok(SyncSummary { created, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        intervention::create_intervention::CreateInterventionUseCase,
        shared::{
            test_helpers::{TestContext, MINUTE},
            usecase::execute,
        },
    };
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use tapp_plus_api_structs::ReminderRuleAttributes;
    use tapp_plus_domain::{
        InterventionPriority, InterventionStatus, NotificationLog, Reminder, ReminderChannel,
        ReminderStatus, SkipReason,
    };
    use tapp_plus_infra::{IReminderRepo, ReminderQuery};

    /// Reminder store that rejects writes while unavailable
    struct FlakyReminderRepo {
        inner: Arc<dyn IReminderRepo>,
        available: AtomicBool,
    }

    impl FlakyReminderRepo {
        fn check(&self) -> anyhow::Result<()> {
            if !self.available.load(Ordering::SeqCst) {
                anyhow::bail!("Reminder store is unavailable");
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl IReminderRepo for FlakyReminderRepo {
        async fn bulk_insert(&self, reminders: &[Reminder]) -> anyhow::Result<usize> {
            self.check()?;
            self.inner.bulk_insert(reminders).await
        }
        async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
            self.inner.find(reminder_id).await
        }
        async fn find_by_intervention(&self, intervention_id: &ID) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_by_intervention(intervention_id).await
        }
        async fn find_by_query(&self, query: &ReminderQuery) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_by_query(query).await
        }
        async fn find_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<Reminder>> {
            self.inner.find_due(now, limit).await
        }
        async fn claim(&self, reminder_id: &ID, now: i64, lease_until: i64) -> anyhow::Result<bool> {
            self.inner.claim(reminder_id, now, lease_until).await
        }
        async fn skip_unclaimed(&self, skips: &[(ID, SkipReason)], now: i64) -> anyhow::Result<usize> {
            self.check()?;
            self.inner.skip_unclaimed(skips, now).await
        }
        async fn complete_attempt(
            &self,
            reminder: &Reminder,
            claimed_until: i64,
            log: Option<&NotificationLog>,
        ) -> anyhow::Result<bool> {
            self.inner.complete_attempt(reminder, claimed_until, log).await
        }
        async fn retry_failed(&self, reminder_id: &ID, now: i64) -> anyhow::Result<bool> {
            self.inner.retry_failed(reminder_id, now).await
        }
        async fn count_by_status(&self) -> anyhow::Result<Vec<(ReminderStatus, i64)>> {
            self.inner.count_by_status().await
        }
    }

    #[actix_web::main]
    #[test]
    async fn materializes_and_is_idempotent() {
        let tc = TestContext::new(0).await;
        let intervention = tc
            .intervention(
                24 * 60 * MINUTE,
                InterventionPriority::Urgent,
                &[(-60, ReminderChannel::Email), (0, ReminderChannel::Sms)],
            )
            .await;

        let reminders = tc
            .ctx
            .repos
            .reminders
            .find_by_intervention(&intervention.id)
            .await
            .unwrap();
        assert_eq!(reminders.len(), 2);

        let mut usecase = SyncInterventionRemindersUseCase {
            request: SyncInterventionRemindersTrigger::InterventionModified(
                intervention.id.clone(),
            ),
        };
        let res = usecase.execute(&tc.ctx).await.unwrap();
        assert_eq!(
            res,
            SyncSummary {
                created: 0,
                skipped: 0
            }
        );
    }

    #[actix_web::main]
    #[test]
    async fn skips_reminders_of_completed_intervention() {
        let tc = TestContext::new(0).await;
        let mut intervention = tc
            .intervention(
                24 * 60 * MINUTE,
                InterventionPriority::Normal,
                &[(-60, ReminderChannel::Email), (-120, ReminderChannel::Sms)],
            )
            .await;
        intervention.status = InterventionStatus::Done;
        tc.ctx.repos.interventions.save(&intervention).await.unwrap();

        let mut usecase = SyncInterventionRemindersUseCase {
            request: SyncInterventionRemindersTrigger::InterventionModified(
                intervention.id.clone(),
            ),
        };
        let res = usecase.execute(&tc.ctx).await.unwrap();
        assert_eq!(
            res,
            SyncSummary {
                created: 0,
                skipped: 2
            }
        );
        let reminders = tc
            .ctx
            .repos
            .reminders
            .find_by_intervention(&intervention.id)
            .await
            .unwrap();
        assert!(reminders.iter().all(|r| r.status == ReminderStatus::Skipped
            && r.last_error.as_deref() == Some("completed")));
    }

    #[actix_web::main]
    #[test]
    async fn unknown_intervention() {
        let tc = TestContext::new(0).await;
        let mut usecase = SyncInterventionRemindersUseCase {
            request: SyncInterventionRemindersTrigger::InterventionModified(Default::default()),
        };
        assert!(matches!(
            usecase.execute(&tc.ctx).await,
            Err(UseCaseErrors::InterventionNotFound(_))
        ));
    }

    #[actix_web::main]
    #[test]
    async fn reconciliation_catches_up_on_failed_synchronization() {
        let mut tc = TestContext::new(0).await;
        let reminders = Arc::new(FlakyReminderRepo {
            inner: tc.ctx.repos.reminders.clone(),
            available: AtomicBool::new(false),
        });
        tc.ctx.repos.reminders = reminders.clone();

        let usecase = CreateInterventionUseCase {
            person_id: tc.person.id.clone(),
            doctor_id: tc.doctor.id.clone(),
            title: "Heart checkup".into(),
            scheduled_at: 2 * 24 * 60 * MINUTE,
            priority: InterventionPriority::Normal,
            rules: vec![ReminderRuleAttributes {
                offset_minutes: -1440,
                channel: ReminderChannel::Email,
                enabled: None,
            }],
        };
        let created = execute(usecase, &tc.ctx).await.unwrap();
        let intervention_id = created.intervention.id.clone();
        assert!(tc
            .ctx
            .repos
            .reminders
            .find_by_intervention(&intervention_id)
            .await
            .unwrap()
            .is_empty());

        // Still failing, the pass is reported and nothing is lost
        let reconcile = || SyncInterventionRemindersUseCase {
            request: SyncInterventionRemindersTrigger::JobScheduler,
        };
        assert!(matches!(
            execute(reconcile(), &tc.ctx).await,
            Err(UseCaseErrors::StorageError)
        ));

        reminders.available.store(true, Ordering::SeqCst);
        let res = execute(reconcile(), &tc.ctx).await.unwrap();
        assert_eq!(
            res,
            SyncSummary {
                created: 1,
                skipped: 0
            }
        );
        let stored = tc
            .ctx
            .repos
            .reminders
            .find_by_intervention(&intervention_id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].remind_at, 24 * 60 * MINUTE);

        // Nothing left to catch up on
        assert_eq!(
            execute(reconcile(), &tc.ctx).await.unwrap(),
            SyncSummary::default()
        );
    }
}
