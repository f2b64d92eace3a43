use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

const API_KEY_HEADER: &str = "tapp-api-key";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum APIErrorVariant {
    Network,
    MalformedResponse,
    BadClientData,
    Unauthorized,
    NotFound,
    Conflict,
    InternalError,
    UnexpectedStatusCode,
}

#[derive(Debug)]
pub struct APIError {
    pub variant: APIErrorVariant,
    pub message: String,
}

impl APIError {
    fn new(variant: APIErrorVariant, message: String) -> Self {
        Self { variant, message }
    }
}

pub type APIResponse<T> = Result<T, APIError>;

pub(crate) struct BaseClient {
    client: Client,
    address: String,
    api_key: Option<String>,
}

impl BaseClient {
    pub fn new(address: String) -> Self {
        Self {
            client: Client::new(),
            address,
            api_key: None,
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.address, path)
    }

    fn with_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(api_key) => req.header(API_KEY_HEADER, api_key),
            None => req,
        }
    }

    async fn handle_api_response<T: DeserializeOwned>(
        &self,
        res: Result<Response, reqwest::Error>,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = res.map_err(|e| APIError::new(APIErrorVariant::Network, e.to_string()))?;
        let status = res.status();
        if status != expected_status_code {
            let variant = match status {
                StatusCode::BAD_REQUEST => APIErrorVariant::BadClientData,
                StatusCode::UNAUTHORIZED => APIErrorVariant::Unauthorized,
                StatusCode::NOT_FOUND => APIErrorVariant::NotFound,
                StatusCode::CONFLICT => APIErrorVariant::Conflict,
                StatusCode::INTERNAL_SERVER_ERROR => APIErrorVariant::InternalError,
                _ => APIErrorVariant::UnexpectedStatusCode,
            };
            let message = res.text().await.unwrap_or_default();
            return Err(APIError::new(variant, message));
        }

        res.json::<T>()
            .await
            .map_err(|e| APIError::new(APIErrorVariant::MalformedResponse, e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let req = self.with_auth(self.client.get(self.url(&path)));
        self.handle_api_response(req.send().await, expected_status_code)
            .await
    }

    pub async fn post<T: DeserializeOwned, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let req = self.with_auth(self.client.post(self.url(&path)).json(&body));
        self.handle_api_response(req.send().await, expected_status_code)
            .await
    }

    pub async fn put<T: DeserializeOwned, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let req = self.with_auth(self.client.put(self.url(&path)).json(&body));
        self.handle_api_response(req.send().await, expected_status_code)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let req = self.with_auth(self.client.delete(self.url(&path)));
        self.handle_api_response(req.send().await, expected_status_code)
            .await
    }
}
