mod doctor;
mod intervention;
mod notification;
mod person;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::doctor::dtos::*;
    pub use crate::intervention::dtos::*;
    pub use crate::person::dtos::*;
    pub use crate::reminder::dtos::*;
}

pub use crate::doctor::api::*;
pub use crate::intervention::api::*;
pub use crate::notification::api::*;
pub use crate::person::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
