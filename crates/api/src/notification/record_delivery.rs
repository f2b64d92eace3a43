use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::record_delivery::{APIResponse, RequestBody};
use tapp_plus_domain::{DeliveryReceiptStatus, NotificationLog};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::UnknownMessage(provider_msg_id) => TappError::NotFound(format!(
            "No notification was sent with the provider message id: {}",
            provider_msg_id
        )),
    }
}

pub async fn record_delivery_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = RecordDeliveryUseCase {
        provider_msg_id: body.provider_msg_id,
        status: body.status,
        timestamp: body.timestamp,
    };

    execute(usecase, &ctx)
        .await
        .map(|log| HttpResponse::Ok().json(APIResponse::new(log)))
        .map_err(error_handler)
}

/// Stores a delivery or read receipt on the log of the sent notification.
/// The `Reminder` itself stays `SENT`.
#[derive(Debug)]
pub struct RecordDeliveryUseCase {
    pub provider_msg_id: String,
    pub status: DeliveryReceiptStatus,
    pub timestamp: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    UnknownMessage(String),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RecordDeliveryUseCase {
    type Response = NotificationLog;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let timestamp = self
            .timestamp
            .unwrap_or_else(|| ctx.sys.get_timestamp_millis());
        ctx.repos
            .notification_logs
            .record_receipt(&self.provider_msg_id, self.status, timestamp)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?
            .ok_or_else(|| UseCaseErrors::UnknownMessage(self.provider_msg_id.clone()))
    }
}
