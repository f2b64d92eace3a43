mod create_person;
mod get_person;

use actix_web::web;
use create_person::create_person_controller;
use get_person::get_person_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/persons", web::post().to(create_person_controller));
    cfg.route("/persons/{person_id}", web::get().to(get_person_controller));
}
