mod create_doctor;
mod get_doctor;

use actix_web::web;
use create_doctor::create_doctor_controller;
use get_doctor::get_doctor_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/doctors", web::post().to(create_doctor_controller));
    cfg.route("/doctors/{doctor_id}", web::get().to(get_doctor_controller));
}
