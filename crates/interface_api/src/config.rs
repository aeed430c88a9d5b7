//! Runtime configuration for the collection API.
//!
//! Every value can be supplied through an `API_`-prefixed environment
//! variable (`API_PORT`, `API_JWT_SECRET`, ...); the server binary loads a
//! `.env` file first so branch deployments only need that one file.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Interface the server binds to
    pub host: String,
    /// Port the server listens on
    pub port: u16,
    /// Secret used to sign and verify collector and admin tokens
    pub jwt_secret: String,
    /// Token lifetime in seconds; long enough to cover a collection round
    pub jwt_expiration_secs: u64,
    /// PostgreSQL connection string
    pub database_url: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 12 * 60 * 60,
            database_url: "postgres://localhost/pigmy".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Bind address in `host:port` form.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr_joins_host_and_port() {
        let config = ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 9090,
            ..ApiConfig::default()
        };
        assert_eq!(config.server_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn test_default_token_lifetime_covers_a_collection_day() {
        let config = ApiConfig::default();
        assert!(config.jwt_expiration_secs >= 8 * 60 * 60);
    }
}
