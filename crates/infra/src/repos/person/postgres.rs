use super::IPersonRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use tapp_plus_domain::{Person, ID};

pub struct PostgresPersonRepo {
    pool: PgPool,
}

impl PostgresPersonRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PersonRaw {
    person_uid: Uuid,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    push_token: Option<String>,
    timezone: String,
    created: i64,
}

impl TryFrom<PersonRaw> for Person {
    type Error = anyhow::Error;

    fn try_from(raw: PersonRaw) -> anyhow::Result<Self> {
        Ok(Person {
            id: raw.person_uid.into(),
            first_name: raw.first_name,
            last_name: raw.last_name,
            email: raw.email,
            phone: raw.phone,
            push_token: raw.push_token,
            timezone: raw
                .timezone
                .parse()
                .map_err(|e| anyhow::anyhow!("Stored timezone is invalid: {}", e))?,
            created: raw.created,
        })
    }
}

#[async_trait::async_trait]
impl IPersonRepo for PostgresPersonRepo {
    async fn insert(&self, person: &Person) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO persons(person_uid, first_name, last_name, email, phone, push_token, timezone, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(person.id.inner_ref())
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(&person.phone)
        .bind(&person.push_token)
        .bind(person.timezone.name())
        .bind(person.created)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, person_id: &ID) -> anyhow::Result<Option<Person>> {
        sqlx::query_as::<_, PersonRaw>(
            r#"
            SELECT * FROM persons AS p
            WHERE p.person_uid = $1
            "#,
        )
        .bind(person_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?
        .map(Person::try_from)
        .transpose()
    }

    async fn find_many(&self, person_ids: &[ID]) -> anyhow::Result<Vec<Person>> {
        let ids = person_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        sqlx::query_as::<_, PersonRaw>(
            r#"
            SELECT * FROM persons AS p
            WHERE p.person_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Person::try_from)
        .collect()
    }
}
