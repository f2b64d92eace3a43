mod cancel_intervention;
mod create_intervention;
mod create_reminder_rule;
mod delete_reminder_rule;
mod get_intervention;
mod get_reminder_rules;
mod subscribers;
pub(crate) mod sync_intervention_reminders;
mod update_intervention;
mod update_reminder_rule;

use actix_web::web;
use cancel_intervention::cancel_intervention_controller;
use create_intervention::create_intervention_controller;
use create_reminder_rule::create_reminder_rule_controller;
use delete_reminder_rule::delete_reminder_rule_controller;
use get_intervention::get_intervention_controller;
use get_reminder_rules::get_reminder_rules_controller;
use tapp_plus_domain::{Intervention, ReminderRule};
use update_intervention::update_intervention_controller;
use update_reminder_rule::update_reminder_rule_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/interventions",
        web::post().to(create_intervention_controller),
    );
    cfg.route(
        "/interventions/{intervention_id}",
        web::get().to(get_intervention_controller),
    );
    cfg.route(
        "/interventions/{intervention_id}",
        web::put().to(update_intervention_controller),
    );
    cfg.route(
        "/interventions/{intervention_id}/cancel",
        web::post().to(cancel_intervention_controller),
    );

    // Reminder rules
    cfg.route(
        "/interventions/{intervention_id}/rules",
        web::post().to(create_reminder_rule_controller),
    );
    cfg.route(
        "/interventions/{intervention_id}/rules",
        web::get().to(get_reminder_rules_controller),
    );
    cfg.route(
        "/interventions/{intervention_id}/rules/{rule_id}",
        web::put().to(update_reminder_rule_controller),
    );
    cfg.route(
        "/interventions/{intervention_id}/rules/{rule_id}",
        web::delete().to(delete_reminder_rule_controller),
    );
}

#[derive(Debug, Clone)]
pub struct InterventionWithRules {
    pub intervention: Intervention,
    pub rules: Vec<ReminderRule>,
}
