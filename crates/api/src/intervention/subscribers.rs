use super::{
    cancel_intervention::CancelInterventionUseCase,
    create_intervention::CreateInterventionUseCase,
    create_reminder_rule::CreateReminderRuleUseCase,
    delete_reminder_rule::DeleteReminderRuleUseCase,
    sync_intervention_reminders::{
        SyncInterventionRemindersTrigger, SyncInterventionRemindersUseCase,
    },
    update_intervention::UpdateInterventionUseCase,
    update_reminder_rule::UpdateReminderRuleUseCase, InterventionWithRules,
};
use crate::shared::usecase::{execute, Subscriber, UseCase};
use tapp_plus_domain::{ReminderRule, ID};
use tapp_plus_infra::TappContext;
use tracing::error;

/// Re-materializes the reminders of the intervention touched by a use case
pub struct SyncRemindersOnInterventionChanged;

async fn sync_reminders(intervention_id: &ID, ctx: &TappContext) {
    let usecase = SyncInterventionRemindersUseCase {
        request: SyncInterventionRemindersTrigger::InterventionModified(intervention_id.clone()),
    };
    // The reconcile job catches up on failed synchronizations
    if let Err(e) = execute(usecase, ctx).await {
        error!(
            intervention_id = %intervention_id,
            "Could not synchronize intervention reminders: {:?}", e
        );
    }
}

/// Use cases whose response identifies the `Intervention` they changed
pub trait ChangesIntervention {
    fn intervention_id(&self) -> &ID;
}

impl ChangesIntervention for InterventionWithRules {
    fn intervention_id(&self) -> &ID {
        &self.intervention.id
    }
}

impl ChangesIntervention for ReminderRule {
    fn intervention_id(&self) -> &ID {
        &self.intervention_id
    }
}

macro_rules! sync_reminders_after {
    ($($usecase:ty),*) => {
        $(
            #[async_trait::async_trait(?Send)]
            impl Subscriber<$usecase> for SyncRemindersOnInterventionChanged {
                async fn notify(&self, e: &<$usecase as UseCase>::Response, ctx: &TappContext) {
                    sync_reminders(e.intervention_id(), ctx).await;
                }
            }
        )*
    };
}

sync_reminders_after!(
    CreateInterventionUseCase,
    UpdateInterventionUseCase,
    CancelInterventionUseCase,
    CreateReminderRuleUseCase,
    UpdateReminderRuleUseCase,
    DeleteReminderRuleUseCase
);
