use crate::{
    intervention::sync_intervention_reminders::{
        SyncInterventionRemindersTrigger, SyncInterventionRemindersUseCase,
    },
    reminder::dispatch_due_reminders::DispatchDueRemindersUseCase,
    shared::usecase::execute,
};
use actix_web::rt::{task::JoinHandle, time::interval};
use std::time::Duration;
use tapp_plus_infra::TappContext;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Runs a dispatch cycle every `poll_interval_secs` and re-synchronizes the
/// reminders of upcoming interventions every `reconcile_interval_secs`, until
/// the token is cancelled. A cycle that has started is always finished.
pub fn start_dispatch_job(ctx: TappContext, token: CancellationToken) -> JoinHandle<()> {
    actix_web::rt::spawn(async move {
        let mut poll_interval = interval(Duration::from_secs(ctx.config.poll_interval_secs));
        poll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut reconcile_interval =
            interval(Duration::from_secs(ctx.config.reconcile_interval_secs));
        reconcile_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            poll_interval_secs = ctx.config.poll_interval_secs,
            reconcile_interval_secs = ctx.config.reconcile_interval_secs,
            batch_size = ctx.config.batch_size,
            "Reminder dispatch job started"
        );
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = reconcile_interval.tick() => {
                    let usecase = SyncInterventionRemindersUseCase {
                        request: SyncInterventionRemindersTrigger::JobScheduler,
                    };
                    if let Err(e) = execute(usecase, &ctx).await {
                        error!("Reminder reconciliation aborted: {:?}", e);
                    }
                }
                _ = poll_interval.tick() => {
                    if let Err(e) = execute(DispatchDueRemindersUseCase {}, &ctx).await {
                        // Retried on the next tick
                        error!("Dispatch cycle aborted: {:?}", e);
                    }
                }
            }
        }
        info!("Reminder dispatch job stopped");
    })
}
