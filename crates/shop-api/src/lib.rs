//! # shop-api
//!
//! HTTP API layer for the tienda backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Login issuing bearer tokens
//! - Server-side cart validation (the client's prices are never trusted)
//! - Uniform `{success, data, message}` envelopes
//!
//! ## Endpoints
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | GET | `/health` | no | Health check |
//! | POST | `/api/login` | no | Token + full catalog |
//! | POST | `/api/carrito` | yes | Validate cart, confirm order |
//! | POST | `/api/productos_vistos` | yes | Register a viewed product |
//! | GET | `/api/productos_vistos` | yes | Informational |
//! | GET | `/api/productos` | no | List products |
//! | GET | `/api/productos/:id` | no | Get product |
//! | GET | `/api/categorias` | no | List categories |

pub mod auth;
pub mod config;
pub mod envelope;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use envelope::{ApiError, ApiResult, Envelope};
pub use routes::create_router;
pub use state::AppState;
