mod inmemory;
mod postgres;

pub use inmemory::InMemoryInterventionRepo;
pub use postgres::PostgresInterventionRepo;
use tapp_plus_domain::{Intervention, ID};

#[async_trait::async_trait]
pub trait IInterventionRepo: Send + Sync {
    async fn insert(&self, intervention: &Intervention) -> anyhow::Result<()>;
    async fn save(&self, intervention: &Intervention) -> anyhow::Result<()>;
    async fn find(&self, intervention_id: &ID) -> anyhow::Result<Option<Intervention>>;
    async fn find_many(&self, intervention_ids: &[ID]) -> anyhow::Result<Vec<Intervention>>;
    /// Interventions that are not canceled or done and take place at or after `now`
    async fn find_upcoming(&self, now: i64) -> anyhow::Result<Vec<Intervention>>;
}
