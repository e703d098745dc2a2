//! Runtime configuration.
//!
//! Values are assembled by the binary from command-line flags and
//! `LOAN_SIM_*` environment variables, then injected into the services.

use std::time::Duration;

/// Addressing used for every outgoing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub sender: String,
    pub recipient: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: "simulations@localhost".into(),
            recipient: "simulations@localhost".into(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Limits applied while a batch is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Maximum number of items priced and persisted at the same time.
    pub max_concurrency: usize,
    /// Upper bound on a single notifier call.
    pub notify_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 64,
            notify_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mail: MailConfig,
    pub batch: BatchConfig,
}
