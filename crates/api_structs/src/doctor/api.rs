use crate::dtos::DoctorDTO;
use serde::{Deserialize, Serialize};
use tapp_plus_domain::{Doctor, ID};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    pub doctor: DoctorDTO,
}

impl DoctorResponse {
    pub fn new(doctor: Doctor) -> Self {
        Self {
            doctor: DoctorDTO::new(doctor),
        }
    }
}

pub mod create_doctor {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        #[serde(default)]
        pub specialty: Option<String>,
    }

    pub type APIResponse = DoctorResponse;
}

pub mod get_doctor {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub doctor_id: ID,
    }

    pub type APIResponse = DoctorResponse;
}
