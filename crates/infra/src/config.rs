use std::{fmt::Display, str::FromStr};
use tapp_plus_domain::RetryPolicy;
use tapp_plus_utils::create_random_secret;
use tracing::{info, warn};

/// Where the webhook notifier posts outgoing reminders
#[derive(Debug, Clone)]
pub struct NotifierWebhookConfig {
    pub url: String,
    /// Sent in the `tapp-notifier-key` header so the gateway can verify the caller
    pub key: Option<String>,
}

/// One hour
const MAX_NOTIFIER_TIMEOUT_MILLIS: u64 = 1000 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Key clients have to provide in the `tapp-api-key` header
    pub api_key: String,
    /// Postgres connection string. The in-memory store is used when missing.
    pub database_url: Option<String>,
    /// Seconds between two dispatch cycles
    pub poll_interval_secs: u64,
    /// Seconds between two passes re-synchronizing the reminders of every
    /// upcoming intervention
    pub reconcile_interval_secs: u64,
    /// Max number of due reminders handled in one dispatch cycle
    pub batch_size: usize,
    /// Max time a single notifier call is allowed to take
    pub notifier_timeout_millis: u64,
    pub retry_policy: RetryPolicy,
    /// The log notifier is used when missing
    pub notifier_webhook: Option<NotifierWebhookConfig>,
}

impl Config {
    pub fn new() -> Self {
        let api_key = match std::env::var("TAPP_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                info!("Did not find TAPP_API_KEY environment variable. Going to create one.");
                let key = create_random_secret(16);
                info!("API key was generated and set to: {}", key);
                key
            }
        };
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        if database_url.is_none() {
            warn!("DATABASE_URL is not set, reminders are kept in memory and lost on restart.");
        }

        let default_policy = RetryPolicy::default();
        let retry_policy = match Self::parse_backoff() {
            Some(backoff) => {
                let max_attempts = parse_env("REMINDER_MAX_ATTEMPTS", default_policy.max_attempts());
                match RetryPolicy::new(backoff, max_attempts) {
                    Ok(policy) => policy,
                    Err(e) => {
                        warn!("Invalid retry policy: {}, falling back to the default policy.", e);
                        default_policy
                    }
                }
            }
            None => default_policy,
        };

        let notifier_webhook = std::env::var("NOTIFIER_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| NotifierWebhookConfig {
                url,
                key: std::env::var("NOTIFIER_WEBHOOK_KEY").ok(),
            });

        Self {
            port: parse_env("PORT", 5000),
            api_key,
            database_url,
            poll_interval_secs: parse_env("REMINDER_POLL_INTERVAL_SECS", 30).max(1),
            reconcile_interval_secs: parse_env("REMINDER_RECONCILE_INTERVAL_SECS", 300).max(1),
            batch_size: parse_env("REMINDER_BATCH_SIZE", 100).max(1),
            notifier_timeout_millis: parse_env("NOTIFIER_TIMEOUT_MILLIS", 10_000)
                .min(MAX_NOTIFIER_TIMEOUT_MILLIS),
            retry_policy,
            notifier_webhook,
        }
    }

    /// A claim outlives a worker stuck in the notifier, so a crashed worker
    /// only delays a reminder by this much.
    pub fn claim_lease_millis(&self) -> i64 {
        i64::try_from(self.notifier_timeout_millis)
            .unwrap_or(i64::MAX)
            .saturating_mul(2)
            .saturating_add(5000)
    }

    /// `None` keeps the default policy, both when the variable is missing and
    /// when it can not be parsed
    fn parse_backoff() -> Option<Vec<i64>> {
        let raw = match std::env::var("REMINDER_BACKOFF_MINUTES") {
            Ok(raw) => raw,
            Err(_) => return Some(RetryPolicy::default().backoff_minutes().to_vec()),
        };
        let backoff = raw
            .split(',')
            .map(|delay| delay.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>();
        match backoff {
            Ok(backoff) => Some(backoff),
            Err(_) => {
                warn!(
                    "The given REMINDER_BACKOFF_MINUTES: {} is not valid, falling back to the default backoff.",
                    raw
                );
                None
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T: FromStr + Display>(name: &str, default: T) -> T {
    let raw = match std::env::var(name) {
        Ok(raw) => raw,
        Err(_) => return default,
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default value: {}.",
                name, raw, default
            );
            default
        }
    }
}
