//! # Shop Error Types
//!
//! Typed error handling for the tienda backend.
//! Every fallible operation returns `Result<T, ShopError>`; the HTTP layer
//! turns each kind into exactly one response envelope.

use thiserror::Error;

/// Core error type for all shop operations.
///
/// `Display` yields the human-readable message shown to the client, so the
/// variants carry the final wording rather than a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    /// Missing or invalid request fields
    #[error("{0}")]
    MalformedInput(String),

    /// Missing, invalid or expired bearer token, or wrong credentials
    #[error("{0}")]
    Unauthenticated(String),

    /// One or more cart lines failed validation
    #[error("Se encontraron problemas con el carrito.")]
    CartRejected { errors: Vec<String> },

    /// Unknown product or resource
    #[error("{0}")]
    NotFound(String),

    /// Endpoint does not accept the request method
    #[error("{0}")]
    MethodNotAllowed(String),

    /// Product/category dataset could not be read or parsed
    #[error("{0}")]
    CatalogUnavailable(String),

    /// User credential dataset could not be read or parsed
    #[error("{0}")]
    CredentialsUnavailable(String),

    /// Startup configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ShopError {
    /// Cart rejected because the submitted payload is not a list
    pub fn invalid_cart_format() -> Self {
        ShopError::MalformedInput("Formato de carrito inválido.".to_string())
    }

    /// Cart rejected before line validation because it has no lines
    pub fn empty_cart() -> Self {
        ShopError::MalformedInput("El carrito está vacío.".to_string())
    }

    pub fn token_missing() -> Self {
        ShopError::Unauthenticated("Token no proporcionado. Debes iniciar sesión.".to_string())
    }

    pub fn token_invalid() -> Self {
        ShopError::Unauthenticated(
            "Token inválido o expirado. Debes iniciar sesión nuevamente.".to_string(),
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::MalformedInput(_) => 400,
            ShopError::Unauthenticated(_) => 401,
            ShopError::CartRejected { .. } => 400,
            ShopError::NotFound(_) => 404,
            ShopError::MethodNotAllowed(_) => 405,
            ShopError::CatalogUnavailable(_) => 500,
            ShopError::CredentialsUnavailable(_) => 500,
            ShopError::Configuration(_) => 500,
        }
    }

    /// Itemized line errors, only present for a rejected cart
    pub fn cart_errors(&self) -> Option<&[String]> {
        match self {
            ShopError::CartRejected { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Result type alias for shop operations
pub type ShopResult<T> = Result<T, ShopError>;
