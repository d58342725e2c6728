use std::env;

use pushkind_common::models::config::CommonServerConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
}

/// Process settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Cookie signing key. `None` means a random key per process.
    pub secret: Option<String>,
    pub auth_service_url: String,
    /// Cookie domain.
    pub domain: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = var_or("PORT", "8080");
        let port = port.parse::<u16>().unwrap_or_else(|err| {
            log::warn!("Invalid PORT value `{port}`: {err}");
            8080
        });

        let auth_service_url =
            env::var("AUTH_SERVICE_URL").map_err(|_| ConfigError::Missing("AUTH_SERVICE_URL"))?;

        Ok(Self {
            database_url: var_or("DATABASE_URL", "app.db"),
            address: var_or("ADDRESS", "127.0.0.1"),
            port,
            secret: env::var("SECRET_KEY").ok(),
            auth_service_url,
            domain: var_or("DOMAIN", "localhost"),
        })
    }

    /// Settings shared with the auth extractor and the logout route.
    pub fn common(&self) -> CommonServerConfig {
        CommonServerConfig {
            secret: self.secret.clone().unwrap_or_default(),
            auth_service_url: self.auth_service_url.clone(),
        }
    }
}
