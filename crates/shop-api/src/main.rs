//! # Tienda
//!
//! Backend for the tienda online frontend.
//!
//! ## Usage
//!
//! ```bash
//! # Optional overrides
//! export TOKEN_SECRET=...
//! export CATALOG_PATH=data/tienda.json
//! export USERS_PATH=data/usuarios.json
//!
//! # Run the server
//! tienda
//! ```

use shop_api::{config::LogFormat, routes, AppConfig, AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize logging
    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };
    tracing_subscriber::registry()
        .with(pretty)
        .with(json)
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    if config.uses_default_secret() && !config.is_development() {
        warn!(
            "Running in {} with the built-in TOKEN_SECRET; set TOKEN_SECRET",
            config.environment
        );
    }

    let addr = config.socket_addr()?;
    let is_prod = config.is_production();

    info!("Environment: {}", config.environment);

    // Initialize application state
    let state = AppState::from_config(config);

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🛒 Tienda starting on http://{}", addr);

    if !is_prod {
        info!("🔑 Login: POST http://{}/api/login", addr);
        info!("🧾 Cart: POST http://{}/api/carrito", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛒 Tienda 🛒
  ━━━━━━━━━━━━━━━━━━━━━━━
  Server-side cart validation
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
