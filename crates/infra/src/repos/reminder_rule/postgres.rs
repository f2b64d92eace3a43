use super::IReminderRuleRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use tapp_plus_domain::{ReminderRule, ID};

pub struct PostgresReminderRuleRepo {
    pool: PgPool,
}

impl PostgresReminderRuleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRuleRaw {
    rule_uid: Uuid,
    intervention_uid: Uuid,
    offset_minutes: i64,
    channel: String,
    enabled: bool,
    created: i64,
}

impl TryFrom<ReminderRuleRaw> for ReminderRule {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRuleRaw) -> anyhow::Result<Self> {
        Ok(ReminderRule {
            id: raw.rule_uid.into(),
            intervention_id: raw.intervention_uid.into(),
            offset_minutes: raw.offset_minutes,
            channel: raw.channel.parse()?,
            enabled: raw.enabled,
            created: raw.created,
        })
    }
}

#[async_trait::async_trait]
impl IReminderRuleRepo for PostgresReminderRuleRepo {
    async fn insert(&self, rule: &ReminderRule) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminder_rules(rule_uid, intervention_uid, offset_minutes, channel, enabled, created)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(rule.id.inner_ref())
        .bind(rule.intervention_id.inner_ref())
        .bind(rule.offset_minutes)
        .bind(rule.channel.as_str())
        .bind(rule.enabled)
        .bind(rule.created)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, rule: &ReminderRule) -> anyhow::Result<()> {
        let rows = sqlx::query(
            r#"
            UPDATE reminder_rules
            SET enabled = $2
            WHERE rule_uid = $1
            "#,
        )
        .bind(rule.id.inner_ref())
        .bind(rule.enabled)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if rows == 0 {
            anyhow::bail!("Reminder rule {} does not exist", rule.id);
        }
        Ok(())
    }

    async fn find(&self, rule_id: &ID) -> anyhow::Result<Option<ReminderRule>> {
        sqlx::query_as::<_, ReminderRuleRaw>(
            r#"
            SELECT * FROM reminder_rules AS r
            WHERE r.rule_uid = $1
            "#,
        )
        .bind(rule_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?
        .map(ReminderRule::try_from)
        .transpose()
    }

    async fn find_by_intervention(&self, intervention_id: &ID) -> anyhow::Result<Vec<ReminderRule>> {
        sqlx::query_as::<_, ReminderRuleRaw>(
            r#"
            SELECT * FROM reminder_rules AS r
            WHERE r.intervention_uid = $1
            ORDER BY r.created, r.offset_minutes
            "#,
        )
        .bind(intervention_id.inner_ref())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ReminderRule::try_from)
        .collect()
    }

    async fn delete(&self, rule_id: &ID) -> anyhow::Result<Option<ReminderRule>> {
        sqlx::query_as::<_, ReminderRuleRaw>(
            r#"
            DELETE FROM reminder_rules AS r
            WHERE r.rule_uid = $1
            RETURNING *
            "#,
        )
        .bind(rule_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?
        .map(ReminderRule::try_from)
        .transpose()
    }
}
