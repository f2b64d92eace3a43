use super::IInterventionRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::{Arc, Mutex};
use tapp_plus_domain::{Intervention, ID};

pub struct InMemoryInterventionRepo {
    /// Shared with the reminder repo, which orders due reminders by priority
    interventions: Arc<Mutex<Vec<Intervention>>>,
}

impl InMemoryInterventionRepo {
    pub fn new(interventions: Arc<Mutex<Vec<Intervention>>>) -> Self {
        Self { interventions }
    }
}

#[async_trait::async_trait]
impl IInterventionRepo for InMemoryInterventionRepo {
    async fn insert(&self, intervention: &Intervention) -> anyhow::Result<()> {
        insert(intervention, &*self.interventions);
        Ok(())
    }

    async fn save(&self, intervention: &Intervention) -> anyhow::Result<()> {
        if !save(intervention, &*self.interventions) {
            anyhow::bail!("Intervention {} does not exist", intervention.id);
        }
        Ok(())
    }

    async fn find(&self, intervention_id: &ID) -> anyhow::Result<Option<Intervention>> {
        Ok(find(intervention_id, &*self.interventions))
    }

    async fn find_many(&self, intervention_ids: &[ID]) -> anyhow::Result<Vec<Intervention>> {
        Ok(find_by(&*self.interventions, |intervention| {
            intervention_ids.contains(&intervention.id)
        }))
    }

    async fn find_upcoming(&self, now: i64) -> anyhow::Result<Vec<Intervention>> {
        Ok(find_by(&*self.interventions, |intervention| {
            intervention.closed_reason().is_none() && intervention.scheduled_at >= now
        }))
    }
}
