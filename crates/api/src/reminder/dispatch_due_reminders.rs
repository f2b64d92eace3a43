use crate::shared::usecase::UseCase;
use actix_web::rt::time::timeout;
use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};
use tapp_plus_domain::{
    apply_attempt, order_due_reminders, render_message, AttemptOutcome, Doctor, Intervention,
    Person, Reminder, ReminderStatus, SkipReason, ID,
};
use tapp_plus_infra::TappContext;
use tracing::{info, warn};

/// One dispatch cycle: sends every reminder that is due, as far as the batch
/// size allows.
///
/// A reminder is claimed before anything is sent so that concurrent workers
/// never send the same reminder twice. The outcome of the attempt and its
/// `NotificationLog` are stored together, and only while the claim is held.
#[derive(Debug)]
pub struct DispatchDueRemindersUseCase {}

#[derive(Debug, Default, PartialEq)]
pub struct DispatchSummary {
    pub due: usize,
    pub sent: usize,
    pub requeued: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Reminders claimed by another worker, or whose claim expired before the
    /// attempt was stored
    pub conflicts: usize,
}

impl DispatchSummary {
    fn record(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Sent => self.sent += 1,
            DispatchOutcome::Requeued => self.requeued += 1,
            DispatchOutcome::Failed => self.failed += 1,
            DispatchOutcome::Skipped => self.skipped += 1,
            DispatchOutcome::Conflict => self.conflicts += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DispatchOutcome {
    Sent,
    Requeued,
    Failed,
    Skipped,
    Conflict,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    /// The store could not be reached, the rest of the cycle is abandoned
    StorageError,
}

struct Recipients {
    persons: HashMap<ID, Person>,
    doctors: HashMap<ID, Doctor>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchDueRemindersUseCase {
    type Response = DispatchSummary;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .repos
            .reminders
            .find_due(now, ctx.config.batch_size)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        if due.is_empty() {
            return Ok(DispatchSummary::default());
        }

        let intervention_ids = unique(due.iter().map(|r| &r.intervention_id));
        let interventions = ctx
            .repos
            .interventions
            .find_many(&intervention_ids)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect::<HashMap<_, _>>();
        let recipients = load_recipients(ctx, interventions.values()).await?;

        let due = order_due_reminders(due, now, |intervention_id| {
            interventions
                .get(intervention_id)
                .map(|i| i.priority)
                .unwrap_or_default()
        });

        let mut summary = DispatchSummary {
            due: due.len(),
            ..Default::default()
        };
        for reminder in due {
            let outcome = dispatch_reminder(ctx, reminder, &recipients).await?;
            summary.record(outcome);
        }

        info!(
            due = summary.due,
            sent = summary.sent,
            requeued = summary.requeued,
            failed = summary.failed,
            skipped = summary.skipped,
            conflicts = summary.conflicts,
            "Dispatch cycle completed"
        );
        Ok(summary)
    }
}

fn unique<'a>(ids: impl Iterator<Item = &'a ID>) -> Vec<ID> {
    ids.cloned()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}

async fn load_recipients<'a>(
    ctx: &TappContext,
    interventions: impl Iterator<Item = &'a Intervention> + Clone,
) -> Result<Recipients, UseCaseErrors> {
    let person_ids = unique(interventions.clone().map(|i| &i.person_id));
    let doctor_ids = unique(interventions.map(|i| &i.doctor_id));

    let persons = ctx
        .repos
        .persons
        .find_many(&person_ids)
        .await
        .map_err(|_| UseCaseErrors::StorageError)?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();
    let doctors = ctx
        .repos
        .doctors
        .find_many(&doctor_ids)
        .await
        .map_err(|_| UseCaseErrors::StorageError)?
        .into_iter()
        .map(|d| (d.id.clone(), d))
        .collect();

    Ok(Recipients { persons, doctors })
}

async fn dispatch_reminder(
    ctx: &TappContext,
    reminder: Reminder,
    recipients: &Recipients,
) -> Result<DispatchOutcome, UseCaseErrors> {
    let now = ctx.sys.get_timestamp_millis();
    let lease_until = now.saturating_add(ctx.config.claim_lease_millis());
    let claimed = ctx
        .repos
        .reminders
        .claim(&reminder.id, now, lease_until)
        .await
        .map_err(|_| UseCaseErrors::StorageError)?;
    if !claimed {
        info!(reminder_id = %reminder.id, "Reminder was claimed by another worker");
        return Ok(DispatchOutcome::Conflict);
    }

    // The intervention may have changed since the reminder was found due
    let intervention = ctx
        .repos
        .interventions
        .find(&reminder.intervention_id)
        .await
        .map_err(|_| UseCaseErrors::StorageError)?;
    let intervention = match intervention {
        Some(intervention) => intervention,
        None => {
            return skip_reminder(ctx, reminder, SkipReason::Canceled, lease_until).await;
        }
    };
    if let Some(reason) = intervention.closed_reason() {
        return skip_reminder(ctx, reminder, reason, lease_until).await;
    }
    if reminder.is_stale(&intervention) {
        return skip_reminder(ctx, reminder, SkipReason::Rescheduled, lease_until).await;
    }

    let person = recipients.persons.get(&intervention.person_id);
    let doctor = recipients.doctors.get(&intervention.doctor_id);
    let to = person.and_then(|p| p.recipient_for(reminder.channel));
    let outcome = match (person, doctor, to) {
        (Some(person), Some(doctor), Some(to)) => {
            let message = render_message(&intervention, person, doctor);
            send(ctx, &reminder, to, &message).await
        }
        (None, _, _) => AttemptOutcome::Failed {
            error: format!("The person with id: {} was not found", intervention.person_id),
            permanent: true,
        },
        (_, None, _) => AttemptOutcome::Failed {
            error: format!("The doctor with id: {} was not found", intervention.doctor_id),
            permanent: true,
        },
        (Some(_), Some(_), None) => AttemptOutcome::Failed {
            error: format!("The person has no {} recipient", reminder.channel),
            permanent: true,
        },
    };

    let record = apply_attempt(
        &reminder,
        to,
        outcome,
        &ctx.config.retry_policy,
        ctx.sys.get_timestamp_millis(),
    );
    let completed = ctx
        .repos
        .reminders
        .complete_attempt(&record.reminder, lease_until, Some(&record.log))
        .await
        .map_err(|_| UseCaseErrors::StorageError)?;
    if !completed {
        warn!(
            reminder_id = %reminder.id,
            "The claim expired before the attempt could be stored"
        );
        return Ok(DispatchOutcome::Conflict);
    }

    let outcome = match record.reminder.status {
        ReminderStatus::Sent => DispatchOutcome::Sent,
        _ if record.requeued() => DispatchOutcome::Requeued,
        _ => DispatchOutcome::Failed,
    };
    match outcome {
        DispatchOutcome::Sent => info!(reminder_id = %reminder.id, "Reminder sent"),
        _ => warn!(
            reminder_id = %reminder.id,
            attempts = record.reminder.attempts,
            error = record.log.error.as_deref().unwrap_or_default(),
            requeued = record.requeued(),
            "Reminder could not be sent"
        ),
    }
    Ok(outcome)
}

async fn send(ctx: &TappContext, reminder: &Reminder, to: &str, message: &str) -> AttemptOutcome {
    let limit = Duration::from_millis(ctx.config.notifier_timeout_millis);
    let sending = ctx
        .notifier
        .send(reminder.channel, to, message, &reminder.idempotency_key);
    match timeout(limit, sending).await {
        Ok(Ok(receipt)) => AttemptOutcome::Sent {
            provider_msg_id: receipt.provider_msg_id,
        },
        Ok(Err(e)) => AttemptOutcome::Failed {
            error: e.to_string(),
            permanent: e.is_permanent(),
        },
        Err(_) => AttemptOutcome::Failed {
            error: format!(
                "The notifier did not answer within {} ms",
                ctx.config.notifier_timeout_millis
            ),
            permanent: false,
        },
    }
}

async fn skip_reminder(
    ctx: &TappContext,
    mut reminder: Reminder,
    reason: SkipReason,
    lease_until: i64,
) -> Result<DispatchOutcome, UseCaseErrors> {
    reminder.skip(reason, ctx.sys.get_timestamp_millis());
    let completed = ctx
        .repos
        .reminders
        .complete_attempt(&reminder, lease_until, None)
        .await
        .map_err(|_| UseCaseErrors::StorageError)?;
    if !completed {
        return Ok(DispatchOutcome::Conflict);
    }
    info!(reminder_id = %reminder.id, reason = reason.as_str(), "Reminder skipped");
    Ok(DispatchOutcome::Skipped)
}
