use crate::{
    reminder_rule::ReminderChannel,
    shared::{
        entity::{Entity, ID},
        validation::{require_text, ValidationError},
    },
};
use chrono_tz::Tz;

/// A `Person` is the patient an `Intervention` is planned for and
/// the recipient of its reminders.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: ID,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Device token used by the push channel
    pub push_token: Option<String>,
    /// Timezone used when rendering times in reminder messages
    pub timezone: Tz,
    pub created: i64,
}

impl Entity for Person {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Person {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.first_name, "firstName")?;
        require_text(&self.last_name, "lastName")?;
        if let Some(email) = &self.email {
            let valid = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
                .unwrap_or(false);
            if !valid {
                return Err(ValidationError::InvalidEmail(email.clone()));
            }
        }
        Ok(())
    }

    /// The address this `Person` is reached at on the given channel
    pub fn recipient_for(&self, channel: ReminderChannel) -> Option<&str> {
        let recipient = match channel {
            ReminderChannel::Email => self.email.as_deref(),
            ReminderChannel::Sms => self.phone.as_deref(),
            ReminderChannel::Push => self.push_token.as_deref(),
        };
        recipient.filter(|r| !r.trim().is_empty())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
