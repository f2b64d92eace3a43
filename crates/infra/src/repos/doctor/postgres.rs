use super::IDoctorRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use tapp_plus_domain::{Doctor, ID};

pub struct PostgresDoctorRepo {
    pool: PgPool,
}

impl PostgresDoctorRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DoctorRaw {
    doctor_uid: Uuid,
    name: String,
    specialty: Option<String>,
    created: i64,
}

impl From<DoctorRaw> for Doctor {
    fn from(raw: DoctorRaw) -> Self {
        Self {
            id: raw.doctor_uid.into(),
            name: raw.name,
            specialty: raw.specialty,
            created: raw.created,
        }
    }
}

#[async_trait::async_trait]
impl IDoctorRepo for PostgresDoctorRepo {
    async fn insert(&self, doctor: &Doctor) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO doctors(doctor_uid, name, specialty, created)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(doctor.id.inner_ref())
        .bind(&doctor.name)
        .bind(&doctor.specialty)
        .bind(doctor.created)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, doctor_id: &ID) -> anyhow::Result<Option<Doctor>> {
        let doctor = sqlx::query_as::<_, DoctorRaw>(
            r#"
            SELECT * FROM doctors AS d
            WHERE d.doctor_uid = $1
            "#,
        )
        .bind(doctor_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(doctor.map(|d| d.into()))
    }

    async fn find_many(&self, doctor_ids: &[ID]) -> anyhow::Result<Vec<Doctor>> {
        let ids = doctor_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let doctors = sqlx::query_as::<_, DoctorRaw>(
            r#"
            SELECT * FROM doctors AS d
            WHERE d.doctor_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors.into_iter().map(|d| d.into()).collect())
    }
}
