use crate::base::{APIResponse, BaseClient};
use reqwest::StatusCode;
use std::sync::Arc;
use tapp_plus_api_structs::*;
use tapp_plus_domain::ID;

#[derive(Clone)]
pub struct PersonClient {
    base: Arc<BaseClient>,
}

pub struct CreatePersonInput {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub push_token: Option<String>,
    pub timezone: Option<String>,
}

impl PersonClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreatePersonInput) -> APIResponse<create_person::APIResponse> {
        let body = create_person::RequestBody {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            push_token: input.push_token,
            timezone: input.timezone,
        };
        self.base
            .post(body, "persons".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, person_id: ID) -> APIResponse<get_person::APIResponse> {
        self.base
            .get(format!("persons/{}", person_id), StatusCode::OK)
            .await
    }
}
