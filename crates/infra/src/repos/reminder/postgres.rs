use super::IReminderRepo;
use crate::repos::shared::query_structs::ReminderQuery;
use sqlx::{types::Uuid, FromRow, PgPool};
use tapp_plus_domain::{NotificationLog, Reminder, ReminderStatus, SkipReason, ID};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    intervention_uid: Uuid,
    rule_uid: Uuid,
    channel: String,
    offset_minutes: i64,
    remind_at: i64,
    planned_send_at: i64,
    status: String,
    attempts: i32,
    last_error: Option<String>,
    idempotency_key: String,
    sent_at: Option<i64>,
    claimed_until: Option<i64>,
    created: i64,
    updated: i64,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> anyhow::Result<Self> {
        Ok(Reminder {
            id: raw.reminder_uid.into(),
            intervention_id: raw.intervention_uid.into(),
            rule_id: raw.rule_uid.into(),
            channel: raw.channel.parse()?,
            offset_minutes: raw.offset_minutes,
            remind_at: raw.remind_at,
            planned_send_at: raw.planned_send_at,
            status: raw.status.parse()?,
            attempts: raw.attempts,
            last_error: raw.last_error,
            idempotency_key: raw.idempotency_key,
            sent_at: raw.sent_at,
            claimed_until: raw.claimed_until,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

#[derive(Debug, FromRow)]
struct StatusCountRaw {
    status: String,
    count: i64,
}

fn to_reminders(rows: Vec<ReminderRaw>) -> anyhow::Result<Vec<Reminder>> {
    rows.into_iter().map(Reminder::try_from).collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn bulk_insert(&self, reminders: &[Reminder]) -> anyhow::Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for reminder in reminders {
            inserted += sqlx::query(
                r#"
                INSERT INTO reminders
                (reminder_uid, intervention_uid, rule_uid, channel, offset_minutes, remind_at, planned_send_at,
                status, attempts, last_error, idempotency_key, sent_at, claimed_until, created, updated)
                VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                ON CONFLICT (idempotency_key) WHERE status <> 'SKIPPED' DO NOTHING
                "#,
            )
            .bind(reminder.id.inner_ref())
            .bind(reminder.intervention_id.inner_ref())
            .bind(reminder.rule_id.inner_ref())
            .bind(reminder.channel.as_str())
            .bind(reminder.offset_minutes)
            .bind(reminder.remind_at)
            .bind(reminder.planned_send_at)
            .bind(reminder.status.as_str())
            .bind(reminder.attempts)
            .bind(&reminder.last_error)
            .bind(&reminder.idempotency_key)
            .bind(reminder.sent_at)
            .bind(reminder.claimed_until)
            .bind(reminder.created)
            .bind(reminder.updated)
            .execute(&mut *tx)
            .await?
            .rows_affected() as usize;
        }
        tx.commit().await?;
        Ok(inserted)
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?
        .map(Reminder::try_from)
        .transpose()
    }

    async fn find_by_intervention(&self, intervention_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.intervention_uid = $1
            ORDER BY r.planned_send_at
            "#,
        )
        .bind(intervention_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        to_reminders(rows)
    }

    async fn find_by_query(&self, query: &ReminderQuery) -> anyhow::Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE ($1::uuid IS NULL OR r.intervention_uid = $1)
            AND ($2::text IS NULL OR r.status = $2)
            AND ($3::text IS NULL OR r.channel = $3)
            ORDER BY r.planned_send_at
            LIMIT $4
            OFFSET $5
            "#,
        )
        .bind(query.intervention_id.as_ref().map(|id| *id.inner_ref()))
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.channel.map(|c| c.as_str()))
        .bind(query.limit as i64)
        .bind(query.skip as i64)
        .fetch_all(&self.pool)
        .await?;
        to_reminders(rows)
    }

    async fn find_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT r.* FROM reminders AS r
            INNER JOIN interventions AS i
                ON i.intervention_uid = r.intervention_uid
            WHERE r.status = 'SCHEDULED'
            AND r.planned_send_at <= $1
            AND (r.claimed_until IS NULL OR r.claimed_until <= $1)
            ORDER BY r.planned_send_at,
                CASE i.priority WHEN 'URGENT' THEN 0 WHEN 'NORMAL' THEN 1 ELSE 2 END
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        to_reminders(rows)
    }

    async fn claim(&self, reminder_id: &ID, now: i64, lease_until: i64) -> anyhow::Result<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE reminders
            SET claimed_until = $3
            WHERE reminder_uid = $1
            AND status = 'SCHEDULED'
            AND (claimed_until IS NULL OR claimed_until <= $2)
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(now)
        .bind(lease_until)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(rows == 1)
    }

    async fn skip_unclaimed(&self, skips: &[(ID, SkipReason)], now: i64) -> anyhow::Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut skipped = 0;
        for (reminder_id, reason) in skips {
            skipped += sqlx::query(
                r#"
                UPDATE reminders
                SET status = 'SKIPPED',
                last_error = $2,
                claimed_until = NULL,
                updated = $3
                WHERE reminder_uid = $1
                AND status = 'SCHEDULED'
                AND (claimed_until IS NULL OR claimed_until <= $3)
                "#,
            )
            .bind(reminder_id.inner_ref())
            .bind(reason.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await?
            .rows_affected() as usize;
        }
        tx.commit().await?;
        Ok(skipped)
    }

    async fn complete_attempt(
        &self,
        reminder: &Reminder,
        claimed_until: i64,
        log: Option<&NotificationLog>,
    ) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(
            r#"
            UPDATE reminders
            SET status = $3,
            planned_send_at = $4,
            attempts = $5,
            last_error = $6,
            sent_at = $7,
            claimed_until = $8,
            updated = $9
            WHERE reminder_uid = $1
            AND status = 'SCHEDULED'
            AND claimed_until = $2
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(claimed_until)
        .bind(reminder.status.as_str())
        .bind(reminder.planned_send_at)
        .bind(reminder.attempts)
        .bind(&reminder.last_error)
        .bind(reminder.sent_at)
        .bind(reminder.claimed_until)
        .bind(reminder.updated)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Some(log) = log {
            sqlx::query(
                r#"
                INSERT INTO notification_logs
                (log_uid, reminder_uid, channel, recipient, status, provider_msg_id, error, created, delivered_at, read_at)
                VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(log.id.inner_ref())
            .bind(log.reminder_id.inner_ref())
            .bind(log.channel.as_str())
            .bind(&log.to)
            .bind(log.status.as_str())
            .bind(&log.provider_msg_id)
            .bind(&log.error)
            .bind(log.created)
            .bind(log.delivered_at)
            .bind(log.read_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn retry_failed(&self, reminder_id: &ID, now: i64) -> anyhow::Result<bool> {
        let rows = sqlx::query(
            r#"
            UPDATE reminders
            SET status = 'SCHEDULED',
            planned_send_at = $2,
            attempts = 0,
            claimed_until = NULL,
            updated = $2
            WHERE reminder_uid = $1
            AND status = 'FAILED'
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(rows == 1)
    }

    async fn count_by_status(&self) -> anyhow::Result<Vec<(ReminderStatus, i64)>> {
        let rows = sqlx::query_as::<_, StatusCountRaw>(
            r#"
            SELECT r.status, COUNT(*) AS count FROM reminders AS r
            GROUP BY r.status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| -> anyhow::Result<_> {
                Ok((row.status.parse::<ReminderStatus>()?, row.count))
            })
            .collect()
    }
}
