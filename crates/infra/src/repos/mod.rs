mod doctor;
mod intervention;
mod notification_log;
mod person;
mod reminder;
mod reminder_rule;
mod shared;

use doctor::{InMemoryDoctorRepo, PostgresDoctorRepo};
use intervention::{InMemoryInterventionRepo, PostgresInterventionRepo};
use notification_log::{InMemoryNotificationLogRepo, PostgresNotificationLogRepo};
use person::{InMemoryPersonRepo, PostgresPersonRepo};
use reminder::{InMemoryReminderRepo, PostgresReminderRepo};
use reminder_rule::{InMemoryReminderRuleRepo, PostgresReminderRuleRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::{Arc, Mutex};
use tracing::info;

pub use doctor::IDoctorRepo;
pub use intervention::IInterventionRepo;
pub use notification_log::INotificationLogRepo;
pub use person::IPersonRepo;
pub use reminder::IReminderRepo;
pub use reminder_rule::IReminderRuleRepo;
pub use shared::query_structs::*;

#[derive(Clone)]
pub struct Repos {
    pub persons: Arc<dyn IPersonRepo>,
    pub doctors: Arc<dyn IDoctorRepo>,
    pub interventions: Arc<dyn IInterventionRepo>,
    pub reminder_rules: Arc<dyn IReminderRuleRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub notification_logs: Arc<dyn INotificationLogRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            persons: Arc::new(PostgresPersonRepo::new(pool.clone())),
            doctors: Arc::new(PostgresDoctorRepo::new(pool.clone())),
            interventions: Arc::new(PostgresInterventionRepo::new(pool.clone())),
            reminder_rules: Arc::new(PostgresReminderRuleRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            notification_logs: Arc::new(PostgresNotificationLogRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        let logs = Arc::new(Mutex::new(Vec::new()));
        let interventions = Arc::new(Mutex::new(Vec::new()));
        Self {
            persons: Arc::new(InMemoryPersonRepo::new()),
            doctors: Arc::new(InMemoryDoctorRepo::new()),
            interventions: Arc::new(InMemoryInterventionRepo::new(Arc::clone(&interventions))),
            reminder_rules: Arc::new(InMemoryReminderRuleRepo::new()),
            reminders: Arc::new(InMemoryReminderRepo::new(
                Arc::clone(&logs),
                interventions,
            )),
            notification_logs: Arc::new(InMemoryNotificationLogRepo::new(logs)),
        }
    }
}
