use super::IReminderRepo;
use crate::repos::shared::{inmemory_repo::*, query_structs::ReminderQuery};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tapp_plus_domain::{
    Intervention, InterventionPriority, NotificationLog, Reminder, ReminderStatus, SkipReason, ID,
};

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
    /// Shared with the notification log repo so that attempts complete atomically
    logs: Arc<Mutex<Vec<NotificationLog>>>,
    /// Shared with the intervention repo to break ties between due reminders
    interventions: Arc<Mutex<Vec<Intervention>>>,
}

impl InMemoryReminderRepo {
    pub fn new(
        logs: Arc<Mutex<Vec<NotificationLog>>>,
        interventions: Arc<Mutex<Vec<Intervention>>>,
    ) -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
            logs,
            interventions,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn bulk_insert(&self, reminders: &[Reminder]) -> anyhow::Result<usize> {
        let mut stored = lock(&self.reminders);
        let mut inserted = 0;
        for reminder in reminders {
            let key_taken = stored.iter().any(|r| {
                r.status != ReminderStatus::Skipped
                    && r.idempotency_key == reminder.idempotency_key
            });
            if !key_taken {
                stored.push(reminder.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        Ok(find(reminder_id, &self.reminders))
    }

    async fn find_by_intervention(&self, intervention_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        Ok(find_by(&self.reminders, |r| {
            r.intervention_id == *intervention_id
        }))
    }

    async fn find_by_query(&self, query: &ReminderQuery) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r| query.matches(r));
        reminders.sort_by_key(|r| r.planned_send_at);
        Ok(reminders
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect())
    }

    async fn find_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<Reminder>> {
        let due = find_by(&self.reminders, |r| r.is_due(now));
        let priorities = lock(&*self.interventions)
            .iter()
            .map(|i| (i.id.clone(), i.priority))
            .collect::<HashMap<_, _>>();
        let mut due = due
            .into_iter()
            .map(|r| {
                let rank = priorities
                    .get(&r.intervention_id)
                    .copied()
                    .unwrap_or(InterventionPriority::Low)
                    .rank();
                (r, rank)
            })
            .collect::<Vec<_>>();
        due.sort_by_key(|(r, rank)| (r.planned_send_at, *rank));
        due.truncate(limit);
        let due = due.into_iter().map(|(r, _)| r).collect();
        Ok(due)
    }

    async fn claim(&self, reminder_id: &ID, now: i64, lease_until: i64) -> anyhow::Result<bool> {
        let claimed = update_many(
            &self.reminders,
            |r| r.id == *reminder_id && r.is_pending(now),
            |r| r.claimed_until = Some(lease_until),
        );
        Ok(claimed > 0)
    }

    async fn skip_unclaimed(&self, skips: &[(ID, SkipReason)], now: i64) -> anyhow::Result<usize> {
        let reasons = skips.iter().cloned().collect::<HashMap<_, _>>();
        let skipped = update_many(
            &self.reminders,
            |r| reasons.contains_key(&r.id) && r.is_pending(now),
            |r| {
                if let Some(reason) = reasons.get(&r.id) {
                    r.skip(*reason, now);
                }
            },
        );
        Ok(skipped)
    }

    async fn complete_attempt(
        &self,
        reminder: &Reminder,
        claimed_until: i64,
        log: Option<&NotificationLog>,
    ) -> anyhow::Result<bool> {
        let mut reminders = lock(&self.reminders);
        let stored = reminders.iter_mut().find(|r| {
            r.id == reminder.id
                && r.status == ReminderStatus::Scheduled
                && r.claimed_until == Some(claimed_until)
        });
        let stored = match stored {
            Some(stored) => stored,
            None => return Ok(false),
        };
        *stored = reminder.clone();
        if let Some(log) = log {
            insert(log, &*self.logs);
        }
        Ok(true)
    }

    async fn retry_failed(&self, reminder_id: &ID, now: i64) -> anyhow::Result<bool> {
        let retried = update_many(
            &self.reminders,
            |r| r.id == *reminder_id && r.status == ReminderStatus::Failed,
            |r| {
                r.status = ReminderStatus::Scheduled;
                r.planned_send_at = now;
                r.attempts = 0;
                r.claimed_until = None;
                r.updated = now;
            },
        );
        Ok(retried > 0)
    }

    async fn count_by_status(&self) -> anyhow::Result<Vec<(ReminderStatus, i64)>> {
        let mut counts = HashMap::new();
        for reminder in lock(&self.reminders).iter() {
            *counts.entry(reminder.status).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
