use serde::{Deserialize, Serialize};
use tapp_plus_domain::{Doctor, ID};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDTO {
    pub id: ID,
    pub name: String,
    pub specialty: Option<String>,
    pub created: i64,
}

impl DoctorDTO {
    pub fn new(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            specialty: doctor.specialty,
            created: doctor.created,
        }
    }
}
