use crate::config::MailConfig;
use crate::domain::ports::Notifier;
use crate::domain::report;
use crate::domain::simulation::Simulation;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const SINGLE_SUBJECT: &str = "Your simulation is ready";
pub const SUMMARY_SUBJECT: &str = "Simulation summary - batch";

/// A fully addressed notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailEnvelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailEnvelope {
    fn new(config: &MailConfig, subject: &str, body: String) -> Self {
        Self {
            from: config.sender.clone(),
            to: config.recipient.clone(),
            subject: subject.to_owned(),
            body,
        }
    }
}

/// Emits every notification as a structured log event instead of delivering it.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    config: MailConfig,
}

impl LogNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn emit(&self, envelope: &MailEnvelope) {
        info!(
            from = %envelope.from,
            to = %envelope.to,
            subject = %envelope.subject,
            bytes = envelope.body.len(),
            "notification sent"
        );
        debug!(body = %envelope.body, "notification body");
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_single(&self, simulation: &Simulation) -> Result<()> {
        let envelope = MailEnvelope::new(
            &self.config,
            SINGLE_SUBJECT,
            report::render_single(simulation),
        );
        self.emit(&envelope);
        Ok(())
    }

    async fn send_summary(&self, report: &str) -> Result<()> {
        let envelope = MailEnvelope::new(&self.config, SUMMARY_SUBJECT, report.to_owned());
        self.emit(&envelope);
        Ok(())
    }
}

/// Keeps every sent envelope in memory, in send order.
///
/// Clones share the same outbox.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    config: MailConfig,
    outbox: Arc<RwLock<Vec<MailEnvelope>>>,
}

impl InMemoryNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            outbox: Arc::default(),
        }
    }

    pub async fn sent(&self) -> Vec<MailEnvelope> {
        self.outbox.read().await.clone()
    }

    pub async fn sent_with_subject(&self, subject: &str) -> Vec<MailEnvelope> {
        self.outbox
            .read()
            .await
            .iter()
            .filter(|envelope| envelope.subject == subject)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn send_single(&self, simulation: &Simulation) -> Result<()> {
        let envelope = MailEnvelope::new(
            &self.config,
            SINGLE_SUBJECT,
            report::render_single(simulation),
        );
        self.outbox.write().await.push(envelope);
        Ok(())
    }

    async fn send_summary(&self, report: &str) -> Result<()> {
        let envelope = MailEnvelope::new(&self.config, SUMMARY_SUBJECT, report.to_owned());
        self.outbox.write().await.push(envelope);
        Ok(())
    }
}
