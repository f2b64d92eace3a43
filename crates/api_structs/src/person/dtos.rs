use serde::{Deserialize, Serialize};
use tapp_plus_domain::{Person, ID};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PersonDTO {
    pub id: ID,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub push_token: Option<String>,
    pub timezone: String,
    pub created: i64,
}

impl PersonDTO {
    pub fn new(person: Person) -> Self {
        Self {
            id: person.id,
            first_name: person.first_name,
            last_name: person.last_name,
            email: person.email,
            phone: person.phone,
            push_token: person.push_token,
            timezone: person.timezone.to_string(),
            created: person.created,
        }
    }
}
