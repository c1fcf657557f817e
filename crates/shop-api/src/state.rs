//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the token service, the two data stores and the cart validator.

use crate::config::{AppConfig, TokenScheme};
use shop_core::{
    BoxedCatalogStore, BoxedCredentialStore, BoxedTokenService, CartValidator, JsonFileStore,
    SharedSecretTokenService, SignedTokenService,
};
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Issues and verifies bearer tokens
    pub tokens: BoxedTokenService,
    /// Product/category dataset
    pub catalog: BoxedCatalogStore,
    /// User credential dataset
    pub users: BoxedCredentialStore,
    pub validator: CartValidator,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Assemble state from already-built collaborators
    pub fn new(
        config: AppConfig,
        tokens: BoxedTokenService,
        catalog: BoxedCatalogStore,
        users: BoxedCredentialStore,
    ) -> Self {
        Self {
            tokens,
            catalog,
            users,
            validator: CartValidator::new(),
            config: Arc::new(config),
        }
    }

    /// Build file-backed stores and the configured token scheme
    pub fn from_config(config: AppConfig) -> Self {
        let tokens = token_service_for(&config);
        let catalog = Arc::new(JsonFileStore::new(&config.catalog_path));
        let users = Arc::new(JsonFileStore::new(&config.users_path));

        info!(
            "Token scheme: {}, catalog: {}, users: {}",
            tokens.scheme(),
            config.catalog_path.display(),
            config.users_path.display()
        );

        Self::new(config, tokens, catalog, users)
    }
}

/// Token service selected by configuration
pub fn token_service_for(config: &AppConfig) -> BoxedTokenService {
    match config.token_scheme {
        TokenScheme::SharedSecret => Arc::new(SharedSecretTokenService::new(
            config.token_secret.clone(),
            config.token_ttl_secs,
        )),
        TokenScheme::Hmac => Arc::new(SignedTokenService::new(
            config.token_secret.clone(),
            config.token_ttl_secs,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_core::TokenService;

    fn config(scheme: TokenScheme) -> AppConfig {
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        config.token_scheme = scheme;
        config
    }

    #[test]
    fn test_default_scheme_is_shared_secret() {
        let tokens = token_service_for(&config(TokenScheme::SharedSecret));
        assert_eq!(tokens.scheme(), "shared-secret");
    }

    #[test]
    fn test_hmac_scheme_is_opt_in() {
        let tokens = token_service_for(&config(TokenScheme::Hmac));
        assert_eq!(tokens.scheme(), "hmac");
        let issued = tokens.issue(1, "ana");
        assert_eq!(tokens.verify(&issued.token).unwrap().user_id, 1);
    }

    #[test]
    fn test_from_config_uses_configured_ttl() {
        let mut cfg = config(TokenScheme::SharedSecret);
        cfg.token_ttl_secs = 120;
        let state = AppState::from_config(cfg);
        let issued = state.tokens.issue_at(1, "ana", 1_000);
        assert_eq!(issued.expires_at, 1_120);
    }
}
