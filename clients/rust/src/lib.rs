mod base;
mod doctor;
mod intervention;
mod person;
mod reminder;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use doctor::DoctorClient;
pub use doctor::CreateDoctorInput;
use intervention::InterventionClient;
pub use intervention::{
    CreateInterventionInput, CreateReminderRuleInput, UpdateInterventionInput,
    UpdateReminderRuleInput,
};
use person::PersonClient;
pub use person::CreatePersonInput;
use reminder::ReminderClient;
pub use reminder::{GetRemindersInput, RecordDeliveryInput};
use status::StatusClient;
use std::sync::Arc;
pub use tapp_plus_api_structs::dtos::*;
pub use tapp_plus_api_structs::ReminderRuleAttributes;
pub use tapp_plus_domain::{
    DeliveryReceiptStatus, InterventionPriority, InterventionStatus, NotificationStatus,
    ReminderChannel, ReminderStatus, ID,
};

/// TappPlus SDK
///
/// Typed client for the TappPlus reminder API. Every request carries the
/// given api key.
#[derive(Clone)]
pub struct TappPlusSDK {
    pub doctor: DoctorClient,
    pub intervention: InterventionClient,
    pub person: PersonClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl TappPlusSDK {
    pub fn new<T: Into<String>>(address: String, api_key: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_api_key(api_key.into());
        let base = Arc::new(base);

        Self {
            doctor: DoctorClient::new(base.clone()),
            intervention: InterventionClient::new(base.clone()),
            person: PersonClient::new(base.clone()),
            reminder: ReminderClient::new(base.clone()),
            status: StatusClient::new(base),
        }
    }
}
