//! # Application Configuration
//!
//! Settings come from the environment (and `.env` if present). The resulting
//! value is passed explicitly into the state; nothing reads the environment
//! after startup.

use shop_core::{ShopError, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Secret shipped with the demo data; fine for development only
pub const DEFAULT_TOKEN_SECRET: &str = "tienda_online_token_secreto_2024";

/// Which token implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScheme {
    /// base64 JSON carrying the shared secret
    SharedSecret,
    /// HMAC-SHA256 signed payload
    Hmac,
}

impl FromStr for TokenScheme {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared-secret" | "shared_secret" | "" => Ok(TokenScheme::SharedSecret),
            "hmac" => Ok(TokenScheme::Hmac),
            other => Err(ShopError::Configuration(format!(
                "TOKEN_SCHEME must be shared-secret or hmac, got {}",
                other
            ))),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ShopError::Configuration(format!(
                "LOG_FORMAT must be pretty or json, got {}",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Secret shared by every issued token
    pub token_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
    pub token_scheme: TokenScheme,
    /// Product/category dataset
    pub catalog_path: PathBuf,
    /// User credential dataset
    pub users_path: PathBuf,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShopError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ShopError::Configuration(format!("PORT is not a valid port: {}", p)))?,
            None => 8080,
        };

        let token_ttl_secs = match lookup("TOKEN_TTL_SECS") {
            Some(t) => t
                .parse::<i64>()
                .ok()
                .filter(|ttl| (1..=MAX_TOKEN_TTL_SECS).contains(ttl))
                .ok_or_else(|| {
                    ShopError::Configuration(format!(
                        "TOKEN_TTL_SECS must be between 1 and {}: {}",
                        MAX_TOKEN_TTL_SECS, t
                    ))
                })?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let config = Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            token_secret: lookup("TOKEN_SECRET").unwrap_or_else(|| DEFAULT_TOKEN_SECRET.to_string()),
            token_ttl_secs,
            token_scheme: lookup("TOKEN_SCHEME").unwrap_or_default().parse()?,
            catalog_path: lookup("CATALOG_PATH")
                .unwrap_or_else(|| "data/tienda.json".to_string())
                .into(),
            users_path: lookup("USERS_PATH")
                .unwrap_or_else(|| "data/usuarios.json".to_string())
                .into(),
            log_format: lookup("LOG_FORMAT").unwrap_or_default().parse()?,
        };

        if config.token_secret.is_empty() {
            return Err(ShopError::Configuration("TOKEN_SECRET must not be empty".to_string()));
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ShopError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ShopError::Configuration(format!("Invalid socket address: {}", e)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ShopError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_app_config_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl_secs, 86_400);
        assert_eq!(config.token_scheme, TokenScheme::SharedSecret);
        assert_eq!(config.catalog_path, PathBuf::from("data/tienda.json"));
        assert!(config.uses_default_secret());
        assert!(config.is_development());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "3000"),
            ("TOKEN_SCHEME", "HMAC"),
            ("TOKEN_TTL_SECS", "60"),
            ("TOKEN_SECRET", "otro"),
            ("LOG_FORMAT", "json"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.token_scheme, TokenScheme::Hmac);
        assert_eq!(config.token_ttl_secs, 60);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.is_production());
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(load(&[("PORT", "abc")]).is_err());
        assert!(load(&[("TOKEN_TTL_SECS", "0")]).is_err());
        assert!(load(&[("TOKEN_TTL_SECS", "9223372036854775807")]).is_err());
        assert!(load(&[("TOKEN_SCHEME", "jwt")]).is_err());
        assert!(load(&[("TOKEN_SECRET", "")]).is_err());
    }

    #[test]
    fn test_ttl_upper_bound() {
        let max = MAX_TOKEN_TTL_SECS.to_string();
        assert_eq!(load(&[("TOKEN_TTL_SECS", max.as_str())]).unwrap().token_ttl_secs, MAX_TOKEN_TTL_SECS);

        let over = (MAX_TOKEN_TTL_SECS + 1).to_string();
        assert!(matches!(
            load(&[("TOKEN_TTL_SECS", over.as_str())]),
            Err(ShopError::Configuration(_))
        ));
    }

    #[test]
    fn test_socket_addr() {
        let mut config = load(&[]).unwrap();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");

        config.host = "not a host".to_string();
        assert!(config.socket_addr().is_err());
    }
}
