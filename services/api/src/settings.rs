//! Service configuration loaded from `BARTERLINK_*` environment variables

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// API service configuration
///
/// # Environment Variables
/// - `BARTERLINK_BIND_ADDRESS`: Listen address (default: "0.0.0.0:3001")
/// - `BARTERLINK_JWT_SECRET`: HS256 secret shared with the identity provider (required)
/// - `BARTERLINK_JWT_AUDIENCE`: Expected `aud` claim (default: "authenticated")
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub jwt_secret: String,
    pub jwt_audience: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:3001")?
            .set_default("jwt_audience", "authenticated")?
            .add_source(Environment::with_prefix("BARTERLINK"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("BARTERLINK_BIND_ADDRESS");
            std::env::remove_var("BARTERLINK_JWT_SECRET");
            std::env::remove_var("BARTERLINK_JWT_AUDIENCE");
        }
    }

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("BARTERLINK_JWT_SECRET", "super-secret");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3001");
        assert_eq!(config.jwt_secret, "super-secret");
        assert_eq!(config.jwt_audience, "authenticated");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_server_config_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("BARTERLINK_JWT_SECRET", "super-secret");
            std::env::set_var("BARTERLINK_BIND_ADDRESS", "127.0.0.1:8080");
            std::env::set_var("BARTERLINK_JWT_AUDIENCE", "barterlink");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.jwt_audience, "barterlink");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_server_config_requires_secret() {
        clear_env();
        assert!(ServerConfig::from_env().is_err());
    }
}
