//! # Request Handlers
//!
//! Axum request handlers for the tienda API. Every handler answers with the
//! `{success, data, message}` envelope except `/health`.

use crate::envelope::{ApiError, ApiResult, Envelope, JsonBody};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shop_core::{
    cart, Catalog, Category, Identity, Order, Product, ShopError, UserProfile, ViewRequest,
    ViewedProduct,
};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Login response payload
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Unix seconds
    #[serde(rename = "expiracion")]
    pub expires_at: i64,
    #[serde(rename = "usuario")]
    pub user: UserProfile,
    /// Full catalog so the client can browse offline
    #[serde(rename = "tienda")]
    pub store: Catalog,
}

/// Placeholder payload for `GET /api/productos_vistos`
#[derive(Debug, Serialize)]
pub struct ViewedInfo {
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
}

/// Query filters for the product listing
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "destacados")]
    pub featured: Option<String>,
}

/// Single product with its resolved category (`null` when dangling)
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "categoria")]
    pub category: Option<Category>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "tienda",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Authenticate a user and hand back a token plus the full catalog
#[instrument(skip_all)]
pub async fn login(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult<LoginResponse> {
    let (Some(username), Some(password)) = (string_field(&body, "username"), string_field(&body, "password"))
    else {
        return Err(ShopError::MalformedInput(
            "Faltan credenciales. Proporciona username y password.".to_string(),
        )
        .into());
    };

    let (username, password) = (username.trim(), password.trim());
    if username.is_empty() || password.is_empty() {
        return Err(ShopError::MalformedInput(
            "Username y password no pueden estar vacíos.".to_string(),
        )
        .into());
    }

    let users = state.users.load_users().await.map_err(|e| {
        error!("Failed to load users: {}", e);
        ShopError::CredentialsUnavailable("Error al cargar usuarios del sistema.".to_string())
    })?;

    let Some(user) = users.find_by_credentials(username, password) else {
        warn!(username = %username, "Login failed");
        return Err(ShopError::Unauthenticated("Credenciales incorrectas.".to_string()).into());
    };

    let issued = state.tokens.issue(user.id, &user.username);

    let store = load_catalog(&state, "Error al cargar el catálogo de la tienda.").await?;

    info!(user_id = user.id, username = %user.username, "Login succeeded");

    Ok(Envelope::ok(
        LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user: user.profile(),
            store,
        },
        format!("Login exitoso. Bienvenido {}", user.name),
    ))
}

/// Recompute a client cart against the catalog and confirm the order
#[instrument(skip_all)]
pub async fn validate_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(body): JsonBody,
) -> ApiResult<Order> {
    let lines = cart::extract_lines(&body)?;

    let catalog = load_catalog(&state, "Error al cargar productos del servidor.").await?;

    let order = state
        .validator
        .validate(lines, &catalog, &identity)
        .map_err(|e| {
            if let Some(errors) = e.cart_errors() {
                warn!(user_id = identity.user_id, errors = ?errors, "Cart rejected");
            }
            e
        })?;

    info!(
        order = %order.number,
        user_id = order.user_id,
        items = order.item_count(),
        total = order.total,
        "Order confirmed"
    );

    Ok(Envelope::ok(order, "¡Pedido confirmado exitosamente!"))
}

/// Acknowledge that the caller viewed a product
#[instrument(skip_all)]
pub async fn register_view(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(body): JsonBody,
) -> ApiResult<ViewedProduct> {
    let request = ViewRequest::from_body(&body, Utc::now())?;

    let catalog = load_catalog(&state, "Error al cargar productos.").await?;

    let record = ViewedProduct::record(&request, &catalog, &identity)?;

    Ok(Envelope::ok(record, "Producto registrado como visto."))
}

/// View history lives in the browser; this only confirms the caller
pub async fn viewed_info(Extension(identity): Extension<Identity>) -> ApiResult<ViewedInfo> {
    Ok(Envelope::ok(
        ViewedInfo {
            message: "Los productos vistos se gestionan en LocalStorage del cliente.".to_string(),
            user_id: identity.user_id,
        },
        "Endpoint informativo.",
    ))
}

/// List products, optionally filtered by category or featured flag
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Vec<Product>> {
    let category = match filter.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            ShopError::MalformedInput("Parámetro categoria inválido.".to_string())
        })?),
    };
    let featured_only = matches!(
        filter.featured.as_deref().map(str::trim),
        Some("true") | Some("1")
    );

    let catalog = load_catalog(&state, "Error al cargar productos.").await?;

    let products: Vec<Product> = match (category, featured_only) {
        (Some(id), true) => catalog
            .products_in_category(id)
            .filter(|p| p.featured)
            .cloned()
            .collect(),
        (Some(id), false) => catalog.products_in_category(id).cloned().collect(),
        (None, true) => catalog.featured_products().cloned().collect(),
        (None, false) => catalog.products,
    };

    Ok(Envelope::ok(products, "Productos disponibles."))
}

/// Get a single product by ID
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<ProductDetail> {
    let catalog = load_catalog(&state, "Error al cargar productos.").await?;

    let product = product_id
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| catalog.get(id))
        .ok_or_else(|| ShopError::NotFound("Producto no encontrado.".to_string()))?;

    Ok(Envelope::ok(
        ProductDetail {
            category: catalog.category_of(product).cloned(),
            product: product.clone(),
        },
        "Producto encontrado.",
    ))
}

/// List all categories
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let catalog = load_catalog(&state, "Error al cargar el catálogo de la tienda.").await?;
    Ok(Envelope::ok(catalog.categories, "Categorías disponibles."))
}

/// 405 for POST-only endpoints
pub async fn method_not_allowed_post() -> ApiError {
    ShopError::MethodNotAllowed("Método no permitido. Usa POST.".to_string()).into()
}

/// 405 for everything else
pub async fn method_not_allowed() -> ApiError {
    ShopError::MethodNotAllowed("Método no permitido.".to_string()).into()
}

/// 404 for unknown paths
pub async fn not_found() -> ApiError {
    ShopError::NotFound("Recurso no encontrado.".to_string()).into()
}

// =============================================================================
// Helpers
// =============================================================================

/// Load the catalog, turning a store failure into a 500 with `message`
async fn load_catalog(state: &AppState, message: &str) -> Result<Catalog, ApiError> {
    state.catalog.load_catalog().await.map_err(|e| {
        error!("Failed to load catalog: {}", e);
        ApiError(ShopError::CatalogUnavailable(message.to_string()))
    })
}

fn string_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_field() {
        let body = json!({"username": "ana", "password": 123});
        assert_eq!(string_field(&body, "username"), Some("ana"));
        assert_eq!(string_field(&body, "password"), None);
        assert_eq!(string_field(&Value::Null, "username"), None);
    }

    #[test]
    fn test_product_detail_flattens_product() {
        let detail = ProductDetail {
            product: Product::new(3, "Teclado", 49.9, 10, 7),
            category: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["nombre"], "Teclado");
        assert!(json["categoria"].is_null());
    }
}
