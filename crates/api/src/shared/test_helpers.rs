use crate::{
    intervention::sync_intervention_reminders::{
        SyncInterventionRemindersTrigger, SyncInterventionRemindersUseCase,
    },
    shared::usecase::execute,
};
use actix_web::rt::time::sleep;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tapp_plus_domain::{
    Doctor, Intervention, InterventionPriority, InterventionStatus, Person, ReminderChannel,
    ReminderRule, Tz,
};
use tapp_plus_infra::{INotifier, ISys, NotifierError, SendReceipt, TappContext};

pub const MINUTE: i64 = 1000 * 60;

/// Clock that only moves when told to
pub struct TestSys {
    now: AtomicI64,
}

impl TestSys {
    pub fn new(now: i64) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(now),
        })
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl ISys for TestSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub channel: ReminderChannel,
    pub recipient: String,
    pub message: String,
    pub idempotency_key: String,
}

/// Notifier replying with queued outcomes, and with success once the queue
/// is empty
pub struct ScriptedNotifier {
    outcomes: Mutex<VecDeque<Result<SendReceipt, NotifierError>>>,
    delay: Mutex<Option<Duration>>,
    sent: Mutex<Vec<SentMessage>>,
}

impl ScriptedNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(VecDeque::new()),
            delay: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn push_outcome(&self, outcome: Result<SendReceipt, NotifierError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl INotifier for ScriptedNotifier {
    async fn send(
        &self,
        channel: ReminderChannel,
        recipient: &str,
        message: &str,
        idempotency_key: &str,
    ) -> Result<SendReceipt, NotifierError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        let attempt = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(SentMessage {
                channel,
                recipient: recipient.to_string(),
                message: message.to_string(),
                idempotency_key: idempotency_key.to_string(),
            });
            sent.len()
        };
        let outcome = self.outcomes.lock().unwrap().pop_front();
        outcome.unwrap_or_else(|| {
            Ok(SendReceipt {
                provider_msg_id: format!("msg-{}", attempt),
            })
        })
    }
}

pub struct TestContext {
    pub ctx: TappContext,
    pub sys: Arc<TestSys>,
    pub notifier: Arc<ScriptedNotifier>,
    pub person: Person,
    pub doctor: Doctor,
}

impl TestContext {
    pub async fn new(now: i64) -> Self {
        let sys = TestSys::new(now);
        let notifier = ScriptedNotifier::new();
        let mut ctx = TappContext::create_inmemory();
        ctx.sys = sys.clone();
        ctx.notifier = notifier.clone();
        ctx.config.notifier_timeout_millis = 1000;
        ctx.config.batch_size = 100;
        ctx.config.retry_policy = Default::default();

        let person = Person {
            id: Default::default(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: Some("ada@example.com".into()),
            phone: Some("+4712345678".into()),
            push_token: None,
            timezone: Tz::UTC,
            created: now,
        };
        ctx.repos.persons.insert(&person).await.unwrap();
        let doctor = Doctor {
            id: Default::default(),
            name: "Dr. Hopper".into(),
            specialty: Some("Cardiology".into()),
            created: now,
        };
        ctx.repos.doctors.insert(&doctor).await.unwrap();

        Self {
            ctx,
            sys,
            notifier,
            person,
            doctor,
        }
    }

    pub fn now(&self) -> i64 {
        self.sys.get_timestamp_millis()
    }

    /// Stores an intervention with the given rules and materializes its reminders
    pub async fn intervention(
        &self,
        scheduled_at: i64,
        priority: InterventionPriority,
        rules: &[(i64, ReminderChannel)],
    ) -> Intervention {
        let intervention = Intervention {
            id: Default::default(),
            person_id: self.person.id.clone(),
            doctor_id: self.doctor.id.clone(),
            title: "Heart checkup".into(),
            scheduled_at,
            priority,
            status: InterventionStatus::Planned,
            created: self.now(),
            updated: self.now(),
        };
        self.ctx
            .repos
            .interventions
            .insert(&intervention)
            .await
            .unwrap();
        for (offset_minutes, channel) in rules {
            let rule = ReminderRule {
                id: Default::default(),
                intervention_id: intervention.id.clone(),
                offset_minutes: *offset_minutes,
                channel: *channel,
                enabled: true,
                created: self.now(),
            };
            self.ctx.repos.reminder_rules.insert(&rule).await.unwrap();
        }
        self.sync(&intervention).await;
        intervention
    }

    pub async fn sync(&self, intervention: &Intervention) {
        let usecase = SyncInterventionRemindersUseCase {
            request: SyncInterventionRemindersTrigger::InterventionModified(
                intervention.id.clone(),
            ),
        };
        execute(usecase, &self.ctx).await.unwrap();
    }
}
