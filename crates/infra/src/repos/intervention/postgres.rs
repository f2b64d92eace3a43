use super::IInterventionRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use tapp_plus_domain::{Intervention, ID};

pub struct PostgresInterventionRepo {
    pool: PgPool,
}

impl PostgresInterventionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct InterventionRaw {
    intervention_uid: Uuid,
    person_uid: Uuid,
    doctor_uid: Uuid,
    title: String,
    scheduled_at: i64,
    priority: String,
    status: String,
    created: i64,
    updated: i64,
}

impl TryFrom<InterventionRaw> for Intervention {
    type Error = anyhow::Error;

    fn try_from(raw: InterventionRaw) -> anyhow::Result<Self> {
        Ok(Intervention {
            id: raw.intervention_uid.into(),
            person_id: raw.person_uid.into(),
            doctor_id: raw.doctor_uid.into(),
            title: raw.title,
            scheduled_at: raw.scheduled_at,
            priority: raw.priority.parse()?,
            status: raw.status.parse()?,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

#[async_trait::async_trait]
impl IInterventionRepo for PostgresInterventionRepo {
    async fn insert(&self, intervention: &Intervention) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO interventions
            (intervention_uid, person_uid, doctor_uid, title, scheduled_at, priority, status, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(intervention.id.inner_ref())
        .bind(intervention.person_id.inner_ref())
        .bind(intervention.doctor_id.inner_ref())
        .bind(&intervention.title)
        .bind(intervention.scheduled_at)
        .bind(intervention.priority.as_str())
        .bind(intervention.status.as_str())
        .bind(intervention.created)
        .bind(intervention.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, intervention: &Intervention) -> anyhow::Result<()> {
        let rows = sqlx::query(
            r#"
            UPDATE interventions
            SET title = $2,
            scheduled_at = $3,
            priority = $4,
            status = $5,
            updated = $6
            WHERE intervention_uid = $1
            "#,
        )
        .bind(intervention.id.inner_ref())
        .bind(&intervention.title)
        .bind(intervention.scheduled_at)
        .bind(intervention.priority.as_str())
        .bind(intervention.status.as_str())
        .bind(intervention.updated)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if rows == 0 {
            anyhow::bail!("Intervention {} does not exist", intervention.id);
        }
        Ok(())
    }

    async fn find(&self, intervention_id: &ID) -> anyhow::Result<Option<Intervention>> {
        sqlx::query_as::<_, InterventionRaw>(
            r#"
            SELECT * FROM interventions AS i
            WHERE i.intervention_uid = $1
            "#,
        )
        .bind(intervention_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?
        .map(Intervention::try_from)
        .transpose()
    }

    async fn find_many(&self, intervention_ids: &[ID]) -> anyhow::Result<Vec<Intervention>> {
        let ids = intervention_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        sqlx::query_as::<_, InterventionRaw>(
            r#"
            SELECT * FROM interventions AS i
            WHERE i.intervention_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Intervention::try_from)
        .collect()
    }

    async fn find_upcoming(&self, now: i64) -> anyhow::Result<Vec<Intervention>> {
        sqlx::query_as::<_, InterventionRaw>(
            r#"
            SELECT * FROM interventions AS i
            WHERE i.status NOT IN ('CANCELED', 'DONE')
            AND i.scheduled_at >= $1
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Intervention::try_from)
        .collect()
    }
}
