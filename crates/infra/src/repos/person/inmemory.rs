use super::IPersonRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::Mutex;
use tapp_plus_domain::{Person, ID};

pub struct InMemoryPersonRepo {
    persons: Mutex<Vec<Person>>,
}

impl InMemoryPersonRepo {
    pub fn new() -> Self {
        Self {
            persons: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IPersonRepo for InMemoryPersonRepo {
    async fn insert(&self, person: &Person) -> anyhow::Result<()> {
        insert(person, &self.persons);
        Ok(())
    }

    async fn find(&self, person_id: &ID) -> anyhow::Result<Option<Person>> {
        Ok(find(person_id, &self.persons))
    }

    async fn find_many(&self, person_ids: &[ID]) -> anyhow::Result<Vec<Person>> {
        Ok(find_by(&self.persons, |person| person_ids.contains(&person.id)))
    }
}
