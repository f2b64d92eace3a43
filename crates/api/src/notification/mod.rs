mod record_delivery;

use actix_web::web;
use record_delivery::record_delivery_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/notifications/delivery",
        web::post().to(record_delivery_controller),
    );
}
