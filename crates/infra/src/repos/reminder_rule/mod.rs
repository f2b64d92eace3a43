mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRuleRepo;
pub use postgres::PostgresReminderRuleRepo;
use tapp_plus_domain::{ReminderRule, ID};

#[async_trait::async_trait]
pub trait IReminderRuleRepo: Send + Sync {
    async fn insert(&self, rule: &ReminderRule) -> anyhow::Result<()>;
    async fn save(&self, rule: &ReminderRule) -> anyhow::Result<()>;
    async fn find(&self, rule_id: &ID) -> anyhow::Result<Option<ReminderRule>>;
    async fn find_by_intervention(&self, intervention_id: &ID) -> anyhow::Result<Vec<ReminderRule>>;
    async fn delete(&self, rule_id: &ID) -> anyhow::Result<Option<ReminderRule>>;
}
