use anyhow::{Context, Result};
use std::env;

/// Runtime configuration, loaded once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub spanner_emulator_host: Option<String>,
    pub spanner_project: String,
    pub spanner_instance: String,
    pub spanner_database: String,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let spanner_emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        let spanner_project = env::var("SPANNER_PROJECT")
            .context("SPANNER_PROJECT environment variable is required")?;

        let spanner_instance = env::var("SPANNER_INSTANCE")
            .context("SPANNER_INSTANCE environment variable is required")?;

        let spanner_database = env::var("SPANNER_DATABASE")
            .context("SPANNER_DATABASE environment variable is required")?;

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host =
            env::var("SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            spanner_emulator_host,
            spanner_project,
            spanner_instance,
            spanner_database,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!(
            emulator = self
                .spanner_emulator_host
                .as_deref()
                .unwrap_or("disabled (using production)"),
            project = %self.spanner_project,
            instance = %self.spanner_instance,
            database = %self.spanner_database,
            "Spanner configuration loaded"
        );
        tracing::info!(
            "Service listening on: {}:{}",
            self.service_host,
            self.service_port
        );
    }
}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
