mod inmemory;
mod postgres;

use crate::repos::shared::query_structs::ReminderQuery;
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use tapp_plus_domain::{NotificationLog, Reminder, ReminderStatus, SkipReason, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Stores the given reminders except those whose idempotency key is already
    /// held by a reminder that is not skipped. Returns how many were stored.
    async fn bulk_insert(&self, reminders: &[Reminder]) -> anyhow::Result<usize>;
    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>>;
    async fn find_by_intervention(&self, intervention_id: &ID) -> anyhow::Result<Vec<Reminder>>;
    async fn find_by_query(&self, query: &ReminderQuery) -> anyhow::Result<Vec<Reminder>>;
    /// Scheduled and unclaimed reminders with `planned_send_at <= now`,
    /// earliest first
    async fn find_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<Reminder>>;
    /// Compare and set of the claim lease. Only succeeds for a scheduled reminder
    /// without a live lease, so at most one worker holds a reminder at a time.
    async fn claim(&self, reminder_id: &ID, now: i64, lease_until: i64) -> anyhow::Result<bool>;
    /// Skips the given reminders if they are still scheduled and not claimed.
    /// Returns how many were skipped.
    async fn skip_unclaimed(&self, skips: &[(ID, SkipReason)], now: i64) -> anyhow::Result<usize>;
    /// Writes the outcome of an attempt together with its log, but only if the
    /// reminder is still held with the lease `claimed_until`. Returns false,
    /// without writing anything, when the claim was lost.
    async fn complete_attempt(
        &self,
        reminder: &Reminder,
        claimed_until: i64,
        log: Option<&NotificationLog>,
    ) -> anyhow::Result<bool>;
    /// Moves a failed reminder back to scheduled, due at `now` with a fresh
    /// attempt budget. Returns false if the reminder is not failed.
    async fn retry_failed(&self, reminder_id: &ID, now: i64) -> anyhow::Result<bool>;
    async fn count_by_status(&self) -> anyhow::Result<Vec<(ReminderStatus, i64)>>;
}

#[cfg(test)]
mod tests {
    use crate::{ReminderQuery, TappContext};
    use std::sync::Arc;
    use tapp_plus_domain::{
        Intervention, InterventionPriority, InterventionStatus, NotificationLog, Reminder,
        ReminderChannel, ReminderRule, ReminderStatus, SkipReason,
    };

    const MINUTE: i64 = 1000 * 60;

    fn intervention(scheduled_at: i64) -> Intervention {
        Intervention {
            id: Default::default(),
            person_id: Default::default(),
            doctor_id: Default::default(),
            title: "Checkup".into(),
            scheduled_at,
            priority: InterventionPriority::Normal,
            status: InterventionStatus::Planned,
            created: 0,
            updated: 0,
        }
    }

    fn reminder(intervention: &Intervention, offset_minutes: i64) -> Reminder {
        let rule = ReminderRule {
            id: Default::default(),
            intervention_id: intervention.id.clone(),
            offset_minutes,
            channel: ReminderChannel::Email,
            enabled: true,
            created: 0,
        };
        Reminder::new(intervention, &rule, 0)
    }

    #[tokio::test]
    async fn bulk_insert_skips_taken_idempotency_keys() {
        let ctx = TappContext::create_inmemory();
        let intervention = intervention(100 * MINUTE);
        let r1 = reminder(&intervention, -10);
        let mut duplicate = r1.clone();
        duplicate.id = Default::default();

        let inserted = ctx
            .repos
            .reminders
            .bulk_insert(&[r1.clone(), duplicate.clone()])
            .await
            .expect("To insert");
        assert_eq!(inserted, 1);

        // A skipped reminder releases its key
        assert_eq!(
            ctx.repos
                .reminders
                .skip_unclaimed(&[(r1.id.clone(), SkipReason::Rescheduled)], 0)
                .await
                .expect("To skip"),
            1
        );
        let inserted = ctx
            .repos
            .reminders
            .bulk_insert(&[duplicate])
            .await
            .expect("To insert");
        assert_eq!(inserted, 1);
        let reminders = ctx
            .repos
            .reminders
            .find_by_intervention(&intervention.id)
            .await
            .expect("To query");
        assert_eq!(reminders.len(), 2);
    }

    #[tokio::test]
    async fn finds_only_due_reminders() {
        let ctx = TappContext::create_inmemory();
        let intervention = intervention(100 * MINUTE);
        let due_late = reminder(&intervention, -10);
        let due_early = reminder(&intervention, -30);
        let not_due = reminder(&intervention, -5);
        let mut sent = reminder(&intervention, -40);
        sent.status = ReminderStatus::Sent;
        let mut claimed = reminder(&intervention, -50);
        claimed.claimed_until = Some(200 * MINUTE);
        ctx.repos
            .reminders
            .bulk_insert(&[
                due_late.clone(),
                due_early.clone(),
                not_due,
                sent,
                claimed,
            ])
            .await
            .expect("To insert");

        let now = 91 * MINUTE;
        let due = ctx.repos.reminders.find_due(now, 10).await.expect("To query");
        let ids = due.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids, vec![due_early.id.clone(), due_late.id]);

        let due = ctx.repos.reminders.find_due(now, 1).await.expect("To query");
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, due_early.id);
    }

    #[tokio::test]
    async fn due_ties_are_broken_by_priority_before_the_limit() {
        let ctx = TappContext::create_inmemory();
        let mut low = intervention(100 * MINUTE);
        low.priority = InterventionPriority::Low;
        let mut urgent = intervention(100 * MINUTE);
        urgent.priority = InterventionPriority::Urgent;
        for i in [&low, &urgent] {
            ctx.repos.interventions.insert(i).await.expect("To insert");
        }
        let low_reminder = reminder(&low, -10);
        let urgent_reminder = reminder(&urgent, -10);
        ctx.repos
            .reminders
            .bulk_insert(&[low_reminder, urgent_reminder.clone()])
            .await
            .expect("To insert");

        let due = ctx
            .repos
            .reminders
            .find_due(95 * MINUTE, 1)
            .await
            .expect("To query");
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, urgent_reminder.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_claims_have_one_winner() {
        let ctx = TappContext::create_inmemory();
        let intervention = intervention(100 * MINUTE);
        let r = reminder(&intervention, -10);
        ctx.repos
            .reminders
            .bulk_insert(&[r.clone()])
            .await
            .expect("To insert");

        let repo = Arc::clone(&ctx.repos.reminders);
        let now = 95 * MINUTE;
        let handles = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let id = r.id.clone();
                tokio::spawn(async move { repo.claim(&id, now, now + MINUTE).await })
            })
            .collect::<Vec<_>>();

        let mut winners = 0;
        for handle in handles {
            if handle.await.expect("Task to finish").expect("To claim") {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);

        // The lease expires and the reminder can be claimed again
        assert!(!repo.claim(&r.id, now + 1, now + MINUTE).await.expect("To claim"));
        assert!(repo
            .claim(&r.id, now + MINUTE, now + 2 * MINUTE)
            .await
            .expect("To claim"));
    }

    #[tokio::test]
    async fn skip_leaves_claimed_reminders_alone() {
        let ctx = TappContext::create_inmemory();
        let intervention = intervention(100 * MINUTE);
        let r1 = reminder(&intervention, -10);
        let r2 = reminder(&intervention, -20);
        ctx.repos
            .reminders
            .bulk_insert(&[r1.clone(), r2.clone()])
            .await
            .expect("To insert");
        let now = 90 * MINUTE;
        assert!(ctx
            .repos
            .reminders
            .claim(&r1.id, now, now + MINUTE)
            .await
            .expect("To claim"));

        let skipped = ctx
            .repos
            .reminders
            .skip_unclaimed(
                &[
                    (r1.id.clone(), SkipReason::Canceled),
                    (r2.id.clone(), SkipReason::Canceled),
                ],
                now,
            )
            .await
            .expect("To skip");
        assert_eq!(skipped, 1);
        let r1 = ctx.repos.reminders.find(&r1.id).await.expect("To query");
        assert_eq!(r1.map(|r| r.status), Some(ReminderStatus::Scheduled));
        let r2 = ctx
            .repos
            .reminders
            .find(&r2.id)
            .await
            .expect("To query")
            .expect("To exist");
        assert_eq!(r2.status, ReminderStatus::Skipped);
        assert_eq!(r2.last_error.as_deref(), Some("canceled"));
    }

    #[tokio::test]
    async fn completing_an_attempt_requires_the_claim() {
        let ctx = TappContext::create_inmemory();
        let intervention = intervention(100 * MINUTE);
        let r = reminder(&intervention, -10);
        ctx.repos
            .reminders
            .bulk_insert(&[r.clone()])
            .await
            .expect("To insert");
        let now = 90 * MINUTE;
        let lease = now + MINUTE;
        assert!(ctx.repos.reminders.claim(&r.id, now, lease).await.expect("To claim"));

        let mut sent = r.clone();
        sent.status = ReminderStatus::Sent;
        sent.attempts = 1;
        sent.sent_at = Some(now);
        let log = NotificationLog::sent(
            r.id.clone(),
            r.channel,
            Some("ada@example.com".into()),
            "msg-1".into(),
            now,
        );

        // Someone else's lease
        let completed = ctx
            .repos
            .reminders
            .complete_attempt(&sent, lease + 1, Some(&log))
            .await
            .expect("To complete");
        assert!(!completed);
        assert!(ctx
            .repos
            .notification_logs
            .find_by_reminder(&r.id)
            .await
            .expect("To query")
            .is_empty());

        let completed = ctx
            .repos
            .reminders
            .complete_attempt(&sent, lease, Some(&log))
            .await
            .expect("To complete");
        assert!(completed);
        let stored = ctx
            .repos
            .reminders
            .find(&r.id)
            .await
            .expect("To query")
            .expect("To exist");
        assert_eq!(stored.status, ReminderStatus::Sent);
        assert_eq!(stored.claimed_until, None);
        let logs = ctx
            .repos
            .notification_logs
            .find_by_reminder(&r.id)
            .await
            .expect("To query");
        assert_eq!(logs, vec![log.clone()]);
        let found = ctx
            .repos
            .notification_logs
            .find_by_provider_msg_id("msg-1")
            .await
            .expect("To query");
        assert_eq!(found, Some(log));

        // Completing twice is not possible
        let completed = ctx
            .repos
            .reminders
            .complete_attempt(&sent, lease, None)
            .await
            .expect("To complete");
        assert!(!completed);
    }

    #[tokio::test]
    async fn retry_and_stats() {
        let ctx = TappContext::create_inmemory();
        let intervention = intervention(100 * MINUTE);
        let mut failed = reminder(&intervention, -10);
        failed.status = ReminderStatus::Failed;
        failed.attempts = 3;
        let scheduled = reminder(&intervention, -20);
        ctx.repos
            .reminders
            .bulk_insert(&[failed.clone(), scheduled.clone()])
            .await
            .expect("To insert");

        let mut counts = ctx.repos.reminders.count_by_status().await.expect("To count");
        counts.sort_by_key(|(status, _)| status.as_str());
        assert_eq!(
            counts,
            vec![(ReminderStatus::Failed, 1), (ReminderStatus::Scheduled, 1)]
        );

        assert!(!ctx
            .repos
            .reminders
            .retry_failed(&scheduled.id, 5)
            .await
            .expect("To retry"));
        assert!(ctx
            .repos
            .reminders
            .retry_failed(&failed.id, 5)
            .await
            .expect("To retry"));
        let retried = ctx
            .repos
            .reminders
            .find(&failed.id)
            .await
            .expect("To query")
            .expect("To exist");
        assert_eq!(retried.status, ReminderStatus::Scheduled);
        assert_eq!(retried.planned_send_at, 5);
        assert_eq!(retried.attempts, 0);

        let query = ReminderQuery {
            status: Some(ReminderStatus::Scheduled),
            limit: 1,
            ..Default::default()
        };
        let res = ctx.repos.reminders.find_by_query(&query).await.expect("To query");
        assert_eq!(res.len(), 1);
        let query = ReminderQuery {
            status: Some(ReminderStatus::Scheduled),
            skip: 1,
            ..Default::default()
        };
        let res = ctx.repos.reminders.find_by_query(&query).await.expect("To query");
        assert_eq!(res.len(), 1);
    }
}
