pub(crate) mod dispatch_due_reminders;
mod get_reminder_logs;
mod get_reminder_stats;
mod get_reminders;
mod retry_reminder;

use actix_web::web;
use get_reminder_logs::get_reminder_logs_controller;
use get_reminder_stats::get_reminder_stats_controller;
use get_reminders::get_reminders_controller;
use retry_reminder::retry_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route(
        "/reminders/stats",
        web::get().to(get_reminder_stats_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/retry",
        web::post().to(retry_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/logs",
        web::get().to(get_reminder_logs_controller),
    );
}
