use super::IReminderRuleRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::Mutex;
use tapp_plus_domain::{ReminderRule, ID};

pub struct InMemoryReminderRuleRepo {
    rules: Mutex<Vec<ReminderRule>>,
}

impl InMemoryReminderRuleRepo {
    pub fn new() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRuleRepo for InMemoryReminderRuleRepo {
    async fn insert(&self, rule: &ReminderRule) -> anyhow::Result<()> {
        insert(rule, &self.rules);
        Ok(())
    }

    async fn save(&self, rule: &ReminderRule) -> anyhow::Result<()> {
        if !save(rule, &self.rules) {
            anyhow::bail!("Reminder rule {} does not exist", rule.id);
        }
        Ok(())
    }

    async fn find(&self, rule_id: &ID) -> anyhow::Result<Option<ReminderRule>> {
        Ok(find(rule_id, &self.rules))
    }

    async fn find_by_intervention(&self, intervention_id: &ID) -> anyhow::Result<Vec<ReminderRule>> {
        Ok(find_by(&self.rules, |rule| {
            rule.intervention_id == *intervention_id
        }))
    }

    async fn delete(&self, rule_id: &ID) -> anyhow::Result<Option<ReminderRule>> {
        Ok(delete(rule_id, &self.rules))
    }
}
