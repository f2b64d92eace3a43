use crate::{
    doctor::Doctor,
    intervention::{Intervention, InterventionPriority},
    person::Person,
    reminder::Reminder,
    shared::entity::ID,
};
use chrono::{TimeZone, Utc};

/// Orders the due `Reminder`s for dispatch: earliest `planned_send_at` first,
/// ties broken by the priority of their `Intervention`. Reminders that are not
/// due at `now` are dropped.
pub fn order_due_reminders<F>(reminders: Vec<Reminder>, now: i64, priority_of: F) -> Vec<Reminder>
where
    F: Fn(&ID) -> InterventionPriority,
{
    let mut due = reminders
        .into_iter()
        .filter(|r| r.is_due(now))
        .map(|r| {
            let rank = priority_of(&r.intervention_id).rank();
            (r, rank)
        })
        .collect::<Vec<_>>();
    due.sort_by(|(r1, rank1), (r2, rank2)| {
        r1.planned_send_at
            .cmp(&r2.planned_send_at)
            .then(rank1.cmp(rank2))
    });
    due.into_iter().map(|(r, _)| r).collect()
}

/// Renders the text sent to the `Person` for a reminder of the `Intervention`
pub fn render_message(intervention: &Intervention, person: &Person, doctor: &Doctor) -> String {
    let starts = match Utc.timestamp_millis_opt(intervention.scheduled_at).single() {
        Some(utc) => utc
            .with_timezone(&person.timezone)
            .format("%Y-%m-%d %H:%M %Z")
            .to_string(),
        None => intervention.scheduled_at.to_string(),
    };
    let prefix = if intervention.is_urgent() { "URGENT: " } else { "" };
    format!(
        "{}Hi {}, reminder of your {} with {} at {}.",
        prefix, person.first_name, intervention.title, doctor.name, starts
    )
}
