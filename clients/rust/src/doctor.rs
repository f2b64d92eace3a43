use crate::base::{APIResponse, BaseClient};
use reqwest::StatusCode;
use std::sync::Arc;
use tapp_plus_api_structs::*;
use tapp_plus_domain::ID;

#[derive(Clone)]
pub struct DoctorClient {
    base: Arc<BaseClient>,
}

pub struct CreateDoctorInput {
    pub name: String,
    pub specialty: Option<String>,
}

impl DoctorClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateDoctorInput) -> APIResponse<create_doctor::APIResponse> {
        let body = create_doctor::RequestBody {
            name: input.name,
            specialty: input.specialty,
        };
        self.base
            .post(body, "doctors".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, doctor_id: ID) -> APIResponse<get_doctor::APIResponse> {
        self.base
            .get(format!("doctors/{}", doctor_id), StatusCode::OK)
            .await
    }
}
