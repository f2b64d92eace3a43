mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, NotifierWebhookConfig};
pub use repos::*;
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys};
use tracing::{info, warn};

#[derive(Clone)]
pub struct TappContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
}

impl TappContext {
    async fn create(config: Config) -> anyhow::Result<Self> {
        let repos = match &config.database_url {
            Some(url) => Repos::create_postgres(url).await?,
            None => {
                warn!("Using the in-memory store");
                Repos::create_inmemory()
            }
        };
        let notifier = create_notifier(&config);
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifier,
        })
    }

    /// Context backed by in-memory repositories and the log notifier
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(LogNotifier {}),
        }
    }
}

fn create_notifier(config: &Config) -> Arc<dyn INotifier> {
    match &config.notifier_webhook {
        Some(webhook) => {
            info!("Sending reminders through the webhook at {}", webhook.url);
            Arc::new(WebhookNotifier::new(
                webhook.url.clone(),
                webhook.key.clone(),
            ))
        }
        None => {
            warn!("NOTIFIER_WEBHOOK_URL is not set, reminders are only logged.");
            Arc::new(LogNotifier {})
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<TappContext> {
    TappContext::create(Config::new()).await
}
