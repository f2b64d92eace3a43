mod inmemory;
mod postgres;

pub use inmemory::InMemoryPersonRepo;
pub use postgres::PostgresPersonRepo;
use tapp_plus_domain::{Person, ID};

#[async_trait::async_trait]
pub trait IPersonRepo: Send + Sync {
    async fn insert(&self, person: &Person) -> anyhow::Result<()>;
    async fn find(&self, person_id: &ID) -> anyhow::Result<Option<Person>>;
    async fn find_many(&self, person_ids: &[ID]) -> anyhow::Result<Vec<Person>>;
}

#[cfg(test)]
mod tests {
    use crate::TappContext;
    use tapp_plus_domain::{Person, Tz, ID};

    #[tokio::test]
    async fn insert_and_find() {
        let ctx = TappContext::create_inmemory();
        let person = Person {
            id: Default::default(),
            first_name: "Kari".into(),
            last_name: "Nordmann".into(),
            email: Some("kari@example.com".into()),
            phone: None,
            push_token: None,
            timezone: Tz::Europe__Oslo,
            created: 0,
        };
        assert!(ctx.repos.persons.insert(&person).await.is_ok());

        let res = ctx.repos.persons.find(&person.id).await.expect("To query");
        assert_eq!(res, Some(person.clone()));
        let res = ctx
            .repos
            .persons
            .find_many(&[person.id.clone(), ID::default()])
            .await
            .expect("To query");
        assert_eq!(res, vec![person]);
        assert!(ctx
            .repos
            .persons
            .find(&ID::default())
            .await
            .expect("To query")
            .is_none());
    }
}
