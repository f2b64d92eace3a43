mod helpers;

use chrono::Utc;
use helpers::setup::spawn_app;
use std::time::Duration;
use tapp_plus_sdk::{
    APIErrorVariant, APIResponse, CreateDoctorInput, CreateInterventionInput, CreatePersonInput,
    CreateReminderRuleInput, GetRemindersInput, InterventionPriority, InterventionStatus,
    ReminderChannel, ReminderRuleAttributes, ReminderStatus, TappPlusSDK,
    UpdateInterventionInput, UpdateReminderRuleInput, ID,
};

const MINUTE: i64 = 1000 * 60;
const DAY: i64 = 24 * 60 * MINUTE;

async fn create_person_and_doctor(sdk: &TappPlusSDK) -> (ID, ID) {
    let person = sdk
        .person
        .create(CreatePersonInput {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: Some("ada@example.com".into()),
            phone: Some("+4712345678".into()),
            push_token: None,
            timezone: Some("Europe/Oslo".into()),
        })
        .await
        .expect("Expected to create person")
        .person;
    let doctor = sdk
        .doctor
        .create(CreateDoctorInput {
            name: "Dr. Hopper".into(),
            specialty: None,
        })
        .await
        .expect("Expected to create doctor")
        .doctor;
    (person.id, doctor.id)
}

fn error_variant<T>(res: APIResponse<T>) -> APIErrorVariant {
    match res {
        Ok(_) => panic!("Expected the request to fail"),
        Err(e) => e.variant,
    }
}

fn rule(offset_minutes: i64, channel: ReminderChannel) -> ReminderRuleAttributes {
    ReminderRuleAttributes {
        offset_minutes,
        channel,
        enabled: None,
    }
}

async fn scheduled_remind_ats(sdk: &TappPlusSDK, intervention_id: &ID) -> Vec<i64> {
    let mut remind_ats = sdk
        .reminder
        .get(GetRemindersInput {
            intervention_id: Some(intervention_id.clone()),
            status: Some(ReminderStatus::Scheduled),
            ..Default::default()
        })
        .await
        .expect("Expected to list reminders")
        .reminders
        .into_iter()
        .map(|r| r.remind_at)
        .collect::<Vec<_>>();
    remind_ats.sort_unstable();
    remind_ats
}

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let (_, sdk) = spawn_app().await;
    assert!(sdk.status.check_health().await.is_ok());
}

#[actix_web::main]
#[test]
async fn test_requires_api_key() {
    let (app, _) = spawn_app().await;
    let sdk = TappPlusSDK::new(app.address.clone(), "wrong-key");
    // Health is public
    assert!(sdk.status.check_health().await.is_ok());

    let res = sdk.reminder.stats().await;
    assert_eq!(error_variant(res), APIErrorVariant::Unauthorized);
}

#[actix_web::main]
#[test]
async fn test_rejects_invalid_input() {
    let (_, sdk) = spawn_app().await;

    let res = sdk
        .person
        .create(CreatePersonInput {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: Some("not-an-email".into()),
            phone: None,
            push_token: None,
            timezone: None,
        })
        .await;
    assert_eq!(error_variant(res), APIErrorVariant::BadClientData);

    let (person_id, _) = create_person_and_doctor(&sdk).await;
    let res = sdk
        .intervention
        .create(CreateInterventionInput {
            person_id,
            doctor_id: ID::default(),
            title: "Checkup".into(),
            scheduled_at: Utc::now().timestamp_millis() + DAY,
            priority: None,
            rules: vec![],
        })
        .await;
    assert_eq!(error_variant(res), APIErrorVariant::BadClientData);

    let res = sdk.person.get(ID::default()).await;
    assert_eq!(error_variant(res), APIErrorVariant::NotFound);
}

#[actix_web::main]
#[test]
async fn test_intervention_rules_become_reminders() {
    let (_, sdk) = spawn_app().await;
    let (person_id, doctor_id) = create_person_and_doctor(&sdk).await;
    let scheduled_at = Utc::now().timestamp_millis() + 3 * DAY;

    let res = sdk
        .intervention
        .create(CreateInterventionInput {
            person_id,
            doctor_id,
            title: "Cardiology consult".into(),
            scheduled_at,
            priority: Some(InterventionPriority::Urgent),
            rules: vec![rule(-1440, ReminderChannel::Sms), rule(0, ReminderChannel::Email)],
        })
        .await
        .expect("Expected to create intervention");
    assert_eq!(res.rules.len(), 2);
    let intervention_id = res.intervention.id;

    assert_eq!(
        scheduled_remind_ats(&sdk, &intervention_id).await,
        vec![scheduled_at - DAY, scheduled_at]
    );

    // Adding a rule adds a reminder
    let rule = sdk
        .intervention
        .create_rule(CreateReminderRuleInput {
            intervention_id: intervention_id.clone(),
            offset_minutes: -60,
            channel: ReminderChannel::Email,
        })
        .await
        .expect("Expected to create rule")
        .rule;
    assert_eq!(
        scheduled_remind_ats(&sdk, &intervention_id).await,
        vec![scheduled_at - DAY, scheduled_at - 60 * MINUTE, scheduled_at]
    );

    // Disabling it skips the reminder again
    sdk.intervention
        .update_rule(UpdateReminderRuleInput {
            intervention_id: intervention_id.clone(),
            rule_id: rule.id.clone(),
            enabled: false,
        })
        .await
        .expect("Expected to disable rule");
    assert_eq!(
        scheduled_remind_ats(&sdk, &intervention_id).await,
        vec![scheduled_at - DAY, scheduled_at]
    );

    sdk.intervention
        .delete_rule(intervention_id.clone(), rule.id)
        .await
        .expect("Expected to delete rule");
    let rules = sdk
        .intervention
        .get_rules(intervention_id)
        .await
        .expect("Expected to get rules")
        .rules;
    assert_eq!(rules.len(), 2);
}

#[actix_web::main]
#[test]
async fn test_reschedule_and_cancel() {
    let (_, sdk) = spawn_app().await;
    let (person_id, doctor_id) = create_person_and_doctor(&sdk).await;
    let scheduled_at = Utc::now().timestamp_millis() + 3 * DAY;

    let intervention = sdk
        .intervention
        .create(CreateInterventionInput {
            person_id,
            doctor_id,
            title: "Physiotherapy".into(),
            scheduled_at,
            priority: None,
            rules: vec![rule(-1440, ReminderChannel::Sms), rule(0, ReminderChannel::Email)],
        })
        .await
        .expect("Expected to create intervention")
        .intervention;
    // The at time notice is reserved for urgent interventions
    assert_eq!(
        scheduled_remind_ats(&sdk, &intervention.id).await,
        vec![scheduled_at - DAY]
    );

    let rescheduled_at = scheduled_at + DAY;
    sdk.intervention
        .update(UpdateInterventionInput {
            intervention_id: intervention.id.clone(),
            scheduled_at: Some(rescheduled_at),
            ..Default::default()
        })
        .await
        .expect("Expected to reschedule intervention");
    assert_eq!(
        scheduled_remind_ats(&sdk, &intervention.id).await,
        vec![rescheduled_at - DAY]
    );

    let canceled = sdk
        .intervention
        .cancel(intervention.id.clone())
        .await
        .expect("Expected to cancel intervention")
        .intervention;
    assert_eq!(canceled.status, InterventionStatus::Canceled);
    assert!(scheduled_remind_ats(&sdk, &intervention.id).await.is_empty());

    let res = sdk
        .intervention
        .update(UpdateInterventionInput {
            intervention_id: intervention.id,
            title: Some("Too late".into()),
            ..Default::default()
        })
        .await;
    assert_eq!(error_variant(res), APIErrorVariant::Conflict);
}

#[actix_web::main]
#[test]
async fn test_due_reminder_is_dispatched() {
    let (_, sdk) = spawn_app().await;
    let (person_id, doctor_id) = create_person_and_doctor(&sdk).await;
    let scheduled_at = Utc::now().timestamp_millis() + 2000;

    let intervention = sdk
        .intervention
        .create(CreateInterventionInput {
            person_id,
            doctor_id,
            title: "Emergency follow up".into(),
            scheduled_at,
            priority: Some(InterventionPriority::Urgent),
            rules: vec![rule(0, ReminderChannel::Email)],
        })
        .await
        .expect("Expected to create intervention")
        .intervention;

    let mut sent = None;
    for _ in 0..20 {
        actix_web::rt::time::sleep(Duration::from_millis(500)).await;
        let reminders = sdk
            .reminder
            .get(GetRemindersInput {
                intervention_id: Some(intervention.id.clone()),
                status: Some(ReminderStatus::Sent),
                ..Default::default()
            })
            .await
            .expect("Expected to list reminders")
            .reminders;
        if let Some(reminder) = reminders.into_iter().next() {
            sent = Some(reminder);
            break;
        }
    }
    let sent = sent.expect("Expected the reminder to be sent");
    assert_eq!(sent.attempts, 1);

    let logs = sdk
        .reminder
        .logs(sent.id.clone())
        .await
        .expect("Expected to get logs")
        .logs;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].to.as_deref(), Some("ada@example.com"));

    let stats = sdk
        .reminder
        .stats()
        .await
        .expect("Expected to get stats")
        .stats;
    assert_eq!(stats.sent, 1);
    assert_eq!(stats.success_rate, Some(1.0));

    // Only failed reminders can be retried
    let res = sdk.reminder.retry(sent.id).await;
    assert_eq!(error_variant(res), APIErrorVariant::Conflict);
}
