use actix_web::{web, HttpResponse};
use tapp_plus_api_structs::get_service_health::*;

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "TappPlus reminders are up".into(),
    })
}

/// Health check, reachable without the api key
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
