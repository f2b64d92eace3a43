use crate::dtos::PersonDTO;
use serde::{Deserialize, Serialize};
use tapp_plus_domain::{Person, ID};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub person: PersonDTO,
}

impl PersonResponse {
    pub fn new(person: Person) -> Self {
        Self {
            person: PersonDTO::new(person),
        }
    }
}

pub mod create_person {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub first_name: String,
        pub last_name: String,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub phone: Option<String>,
        #[serde(default)]
        pub push_token: Option<String>,
        /// IANA timezone, defaults to UTC
        #[serde(default)]
        pub timezone: Option<String>,
    }

    pub type APIResponse = PersonResponse;
}

pub mod get_person {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub person_id: ID,
    }

    pub type APIResponse = PersonResponse;
}
