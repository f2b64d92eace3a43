use super::{subscribers::SyncRemindersOnInterventionChanged, InterventionWithRules};
use crate::{
    error::TappError,
    shared::{
        auth::protect_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use tapp_plus_api_structs::create_intervention::{APIResponse, RequestBody};
use tapp_plus_api_structs::ReminderRuleAttributes;
use tapp_plus_domain::{
    Intervention, InterventionPriority, InterventionStatus, ReminderRule, ValidationError, ID,
};
use tapp_plus_infra::TappContext;

fn error_handler(e: UseCaseErrors) -> TappError {
    match e {
        UseCaseErrors::StorageError => TappError::InternalError,
        UseCaseErrors::InvalidIntervention(e) => TappError::BadClientData(e.to_string()),
        UseCaseErrors::PersonNotFound(id) => TappError::BadClientData(format!(
            "The person with id: {}, was not found.",
            id
        )),
        UseCaseErrors::DoctorNotFound(id) => TappError::BadClientData(format!(
            "The doctor with id: {}, was not found.",
            id
        )),
    }
}

pub async fn create_intervention_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<TappContext>,
) -> Result<HttpResponse, TappError> {
    protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateInterventionUseCase {
        person_id: body.person_id,
        doctor_id: body.doctor_id,
        title: body.title,
        scheduled_at: body.scheduled_at,
        priority: body.priority.unwrap_or_default(),
        rules: body.rules.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.intervention, res.rules)))
        .map_err(error_handler)
}

#[derive(Debug)]
pub struct CreateInterventionUseCase {
    pub person_id: ID,
    pub doctor_id: ID,
    pub title: String,
    pub scheduled_at: i64,
    pub priority: InterventionPriority,
    pub rules: Vec<ReminderRuleAttributes>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidIntervention(ValidationError),
    PersonNotFound(ID),
    DoctorNotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateInterventionUseCase {
    type Response = InterventionWithRules;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &TappContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let intervention = Intervention {
            id: Default::default(),
            person_id: self.person_id.clone(),
            doctor_id: self.doctor_id.clone(),
            title: self.title.trim().to_string(),
            scheduled_at: self.scheduled_at,
            priority: self.priority,
            status: InterventionStatus::Planned,
            created: now,
            updated: now,
        };
        intervention
            .validate()
            .map_err(UseCaseErrors::InvalidIntervention)?;
        let rules = self
            .rules
            .iter()
            .map(|attributes| {
                let rule = ReminderRule {
                    id: Default::default(),
                    intervention_id: intervention.id.clone(),
                    offset_minutes: attributes.offset_minutes,
                    channel: attributes.channel,
                    enabled: attributes.enabled.unwrap_or(true),
                    created: now,
                };
                rule.validate().map(|_| rule)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(UseCaseErrors::InvalidIntervention)?;

        let person = ctx
            .repos
            .persons
            .find(&self.person_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        if person.is_none() {
            return Err(UseCaseErrors::PersonNotFound(self.person_id.clone()));
        }
        let doctor = ctx
            .repos
            .doctors
            .find(&self.doctor_id)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        if doctor.is_none() {
            return Err(UseCaseErrors::DoctorNotFound(self.doctor_id.clone()));
        }

        ctx.repos
            .interventions
            .insert(&intervention)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        for rule in &rules {
            ctx.repos
                .reminder_rules
                .insert(rule)
                .await
                .map_err(|_| UseCaseErrors::StorageError)?;
        }

        Ok(InterventionWithRules {
            intervention,
            rules,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnInterventionChanged)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{TestContext, MINUTE};
    use chrono::{TimeZone, Utc};
    use tapp_plus_domain::{ReminderChannel, ReminderStatus};

    fn usecase(tc: &TestContext, scheduled_at: i64, priority: InterventionPriority) -> CreateInterventionUseCase {
        CreateInterventionUseCase {
            person_id: tc.person.id.clone(),
            doctor_id: tc.doctor.id.clone(),
            title: "Cardiology consult".into(),
            scheduled_at,
            priority,
            rules: vec![
                ReminderRuleAttributes {
                    offset_minutes: -1440,
                    channel: ReminderChannel::Sms,
                    enabled: None,
                },
                ReminderRuleAttributes {
                    offset_minutes: 0,
                    channel: ReminderChannel::Push,
                    enabled: None,
                },
            ],
        }
    }

    async fn remind_ats(tc: &TestContext, intervention: &Intervention) -> Vec<i64> {
        let mut remind_ats = tc
            .ctx
            .repos
            .reminders
            .find_by_intervention(&intervention.id)
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.status == ReminderStatus::Scheduled)
            .map(|r| r.remind_at)
            .collect::<Vec<_>>();
        remind_ats.sort_unstable();
        remind_ats
    }

    #[actix_web::main]
    #[test]
    async fn urgent_intervention_gets_day_before_and_at_time_reminders() {
        let scheduled_at = Utc
            .with_ymd_and_hms(2025, 1, 10, 10, 0, 0)
            .unwrap()
            .timestamp_millis();
        let tc = TestContext::new(scheduled_at - 3 * 24 * 60 * MINUTE).await;

        let res = execute(usecase(&tc, scheduled_at, InterventionPriority::Urgent), &tc.ctx)
            .await
            .unwrap();
        assert_eq!(res.rules.len(), 2);
        assert_eq!(
            remind_ats(&tc, &res.intervention).await,
            vec![scheduled_at - 1440 * MINUTE, scheduled_at]
        );
    }

    #[actix_web::main]
    #[test]
    async fn normal_intervention_gets_only_day_before_reminder() {
        let scheduled_at = Utc
            .with_ymd_and_hms(2025, 1, 10, 10, 0, 0)
            .unwrap()
            .timestamp_millis();
        let tc = TestContext::new(scheduled_at - 3 * 24 * 60 * MINUTE).await;

        let res = execute(usecase(&tc, scheduled_at, InterventionPriority::Normal), &tc.ctx)
            .await
            .unwrap();
        assert_eq!(
            remind_ats(&tc, &res.intervention).await,
            vec![scheduled_at - 1440 * MINUTE]
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_input() {
        let tc = TestContext::new(0).await;

        let mut missing_title = usecase(&tc, MINUTE, InterventionPriority::Normal);
        missing_title.title = "  ".into();
        assert!(matches!(
            execute(missing_title, &tc.ctx).await,
            Err(UseCaseErrors::InvalidIntervention(_))
        ));

        let mut unknown_person = usecase(&tc, MINUTE, InterventionPriority::Normal);
        unknown_person.person_id = Default::default();
        assert!(matches!(
            execute(unknown_person, &tc.ctx).await,
            Err(UseCaseErrors::PersonNotFound(_))
        ));

        let mut unknown_doctor = usecase(&tc, MINUTE, InterventionPriority::Normal);
        unknown_doctor.doctor_id = Default::default();
        assert!(matches!(
            execute(unknown_doctor, &tc.ctx).await,
            Err(UseCaseErrors::DoctorNotFound(_))
        ));
    }
}
