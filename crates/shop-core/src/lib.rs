//! # shop-core
//!
//! Core types and logic for the tienda backend.
//!
//! This crate provides:
//! - `Catalog`, `Product` and `Category` for the read-only product dataset
//! - `CatalogStore` and `CredentialStore` for loading the datasets
//! - `TokenService` for issuing and verifying bearer tokens
//! - `CartValidator` for recomputing a client cart against the catalog
//! - `Order` and `ViewedProduct` result values
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{CartValidator, SharedSecretTokenService, TokenService};
//!
//! let tokens = SharedSecretTokenService::new(secret, DEFAULT_TOKEN_TTL_SECS);
//! let identity = tokens.verify(&bearer)?;
//!
//! let catalog = store.load_catalog().await?;
//! let lines = shop_core::cart::extract_lines(&body)?;
//! let order = CartValidator::new().validate(lines, &catalog, &identity)?;
//! ```

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod product;
pub mod store;
pub mod token;
pub mod user;
pub mod viewed;

// Re-exports for convenience
pub use cart::{CartLineClient, CartValidator};
pub use error::{ShopError, ShopResult};
pub use order::{CartLineValidated, Order, OrderStatus};
pub use product::{Catalog, Category, Product};
pub use store::{
    BoxedCatalogStore, BoxedCredentialStore, CatalogStore, CredentialStore,
    InMemoryCatalogStore, InMemoryCredentialStore, JsonFileStore, StoreError,
};
pub use token::{
    BoxedTokenService, Identity, IssuedToken, SharedSecretTokenService, SignedTokenService,
    TokenError, TokenService, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS,
};
pub use user::{User, UserDirectory, UserProfile};
pub use viewed::{ViewRequest, ViewedProduct};
