use tapp_plus_domain::{Reminder, ReminderChannel, ReminderStatus, ID};

/// Filters for listing `Reminder`s, all of them optional
#[derive(Debug, Clone)]
pub struct ReminderQuery {
    pub intervention_id: Option<ID>,
    pub status: Option<ReminderStatus>,
    pub channel: Option<ReminderChannel>,
    pub skip: usize,
    pub limit: usize,
}

impl Default for ReminderQuery {
    fn default() -> Self {
        Self {
            intervention_id: None,
            status: None,
            channel: None,
            skip: 0,
            limit: 100,
        }
    }
}

impl ReminderQuery {
    pub fn matches(&self, reminder: &Reminder) -> bool {
        self.intervention_id
            .as_ref()
            .map(|id| reminder.intervention_id == *id)
            .unwrap_or(true)
            && self.status.map(|s| reminder.status == s).unwrap_or(true)
            && self.channel.map(|c| reminder.channel == c).unwrap_or(true)
    }
}
