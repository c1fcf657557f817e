//! # Routes
//!
//! Axum router configuration for the tienda API.
//!
//! Protected routes run the bearer check before method dispatch, so a
//! request without a token is answered with 401 even on the wrong method.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Public:
///   - POST /api/login - Authenticate, returns token + catalog
///   - GET  /api/productos - List products (`?categoria=<id>&destacados=true`)
///   - GET  /api/productos/{id} - Get product by ID
///   - GET  /api/categorias - List categories
///
/// - Bearer token required:
///   - POST /api/carrito - Validate cart and confirm order
///   - POST /api/productos_vistos - Register a viewed product
///   - GET  /api/productos_vistos - Informational
///
/// The `.php` paths of the legacy frontend are aliases of the same handlers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected_routes = Router::new()
        .route("/carrito", cart_route())
        .route("/carrito.php", cart_route())
        .route("/productos_vistos", viewed_route())
        .route("/productos_vistos.php", viewed_route())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    let public_routes = Router::new()
        .route("/login", login_route())
        .route("/login.php", login_route())
        .route(
            "/productos",
            get(handlers::list_products).fallback(handlers::method_not_allowed),
        )
        .route(
            "/productos/{product_id}",
            get(handlers::get_product).fallback(handlers::method_not_allowed),
        )
        .route(
            "/categorias",
            get(handlers::list_categories).fallback(handlers::method_not_allowed),
        );

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn login_route() -> MethodRouter<AppState> {
    post(handlers::login).fallback(handlers::method_not_allowed_post)
}

fn cart_route() -> MethodRouter<AppState> {
    post(handlers::validate_cart).fallback(handlers::method_not_allowed_post)
}

fn viewed_route() -> MethodRouter<AppState> {
    post(handlers::register_view)
        .get(handlers::viewed_info)
        .fallback(handlers::method_not_allowed)
}
