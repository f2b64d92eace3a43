use super::INotificationLogRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use tapp_plus_domain::{DeliveryReceiptStatus, NotificationLog, ID};

pub struct PostgresNotificationLogRepo {
    pool: PgPool,
}

impl PostgresNotificationLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationLogRaw {
    log_uid: Uuid,
    reminder_uid: Uuid,
    channel: String,
    recipient: Option<String>,
    status: String,
    provider_msg_id: Option<String>,
    error: Option<String>,
    created: i64,
    delivered_at: Option<i64>,
    read_at: Option<i64>,
}

impl TryFrom<NotificationLogRaw> for NotificationLog {
    type Error = anyhow::Error;

    fn try_from(raw: NotificationLogRaw) -> anyhow::Result<Self> {
        Ok(NotificationLog {
            id: raw.log_uid.into(),
            reminder_id: raw.reminder_uid.into(),
            channel: raw.channel.parse()?,
            to: raw.recipient,
            status: raw.status.parse()?,
            provider_msg_id: raw.provider_msg_id,
            error: raw.error,
            created: raw.created,
            delivered_at: raw.delivered_at,
            read_at: raw.read_at,
        })
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for PostgresNotificationLogRepo {
    async fn find_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<Vec<NotificationLog>> {
        sqlx::query_as::<_, NotificationLogRaw>(
            r#"
            SELECT * FROM notification_logs AS l
            WHERE l.reminder_uid = $1
            ORDER BY l.created
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(NotificationLog::try_from)
        .collect()
    }

    async fn find_by_provider_msg_id(
        &self,
        provider_msg_id: &str,
    ) -> anyhow::Result<Option<NotificationLog>> {
        sqlx::query_as::<_, NotificationLogRaw>(
            r#"
            SELECT * FROM notification_logs AS l
            WHERE l.provider_msg_id = $1
            "#,
        )
        .bind(provider_msg_id)
        .fetch_optional(&self.pool)
        .await?
        .map(NotificationLog::try_from)
        .transpose()
    }

    async fn record_receipt(
        &self,
        provider_msg_id: &str,
        receipt: DeliveryReceiptStatus,
        timestamp: i64,
    ) -> anyhow::Result<Option<NotificationLog>> {
        let read = receipt == DeliveryReceiptStatus::Read;
        sqlx::query_as::<_, NotificationLogRaw>(
            r#"
            UPDATE notification_logs
            SET delivered_at = COALESCE(delivered_at, $2),
            read_at = CASE WHEN $3 THEN COALESCE(read_at, $2) ELSE read_at END,
            status = CASE
                WHEN $3 THEN 'READ'
                WHEN status = 'READ' THEN status
                ELSE 'DELIVERED'
            END
            WHERE provider_msg_id = $1
            RETURNING *
            "#,
        )
        .bind(provider_msg_id)
        .bind(timestamp)
        .bind(read)
        .fetch_optional(&self.pool)
        .await?
        .map(NotificationLog::try_from)
        .transpose()
    }
}
