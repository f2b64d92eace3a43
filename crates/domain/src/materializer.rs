use crate::{
    intervention::Intervention,
    reminder::{Reminder, ReminderStatus, SkipReason},
    reminder_rule::ReminderRule,
    shared::entity::ID,
};
use std::collections::HashSet;

/// Changes needed to bring the stored `Reminder`s of an `Intervention`
/// in line with its `ReminderRule`s
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MaterializationPlan {
    pub create: Vec<Reminder>,
    pub skip: Vec<(ID, SkipReason)>,
}

impl MaterializationPlan {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.skip.is_empty()
    }
}

/// Computes which `Reminder`s have to be created and which pending ones have
/// to be skipped for the current state of the `Intervention`.
///
/// `existing` are all stored reminders of the intervention. Reminders that are
/// in flight are never touched, the worker holding them finishes its attempt.
/// An existing reminder that is not skipped blocks a new one with the same
/// idempotency key, so running this twice on unchanged input plans nothing.
pub fn materialize(
    intervention: &Intervention,
    rules: &[ReminderRule],
    existing: &[Reminder],
    now: i64,
) -> MaterializationPlan {
    let mut plan = MaterializationPlan::default();
    let pending = existing
        .iter()
        .filter(|r| r.intervention_id == intervention.id && r.is_pending(now))
        .collect::<Vec<_>>();

    if let Some(reason) = intervention.closed_reason() {
        plan.skip = pending.iter().map(|r| (r.id.clone(), reason)).collect();
        return plan;
    }

    let mut taken_keys = existing
        .iter()
        .filter(|r| r.status != ReminderStatus::Skipped)
        .map(|r| r.idempotency_key.clone())
        .collect::<HashSet<_>>();

    for rule in rules.iter().filter(|r| r.intervention_id == intervention.id) {
        let rule_pending = pending.iter().filter(|r| r.rule_id == rule.id);

        if !rule.enabled {
            plan.skip.extend(
                rule_pending.map(|r| (r.id.clone(), SkipReason::RuleDisabled)),
            );
            continue;
        }

        let remind_at = intervention.remind_at(rule.offset_minutes);
        let key = Reminder::idempotency_key(&intervention.id, &rule.id, remind_at);

        for stale in rule_pending.filter(|r| r.idempotency_key != key) {
            plan.skip.push((stale.id.clone(), SkipReason::Rescheduled));
            taken_keys.remove(&stale.idempotency_key);
        }

        if taken_keys.contains(&key) {
            continue;
        }
        if rule.is_immediate() && !intervention.is_urgent() {
            // At-time notices are reserved for urgent interventions
            continue;
        }
        let immediate_urgent = rule.is_immediate() && intervention.is_urgent();
        if remind_at < now && !immediate_urgent {
            continue;
        }

        taken_keys.insert(key);
        plan.create.push(Reminder::new(intervention, rule, now));
    }

    let rule_ids = rules.iter().map(|r| &r.id).collect::<HashSet<_>>();
    plan.skip.extend(
        pending
            .iter()
            .filter(|r| !rule_ids.contains(&r.rule_id))
            .map(|r| (r.id.clone(), SkipReason::RuleRemoved)),
    );

    plan
}
