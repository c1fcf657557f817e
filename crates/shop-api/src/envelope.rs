//! # Response Envelope
//!
//! Every API response, success or failure, is written as
//! `{"success": bool, "data": any|null, "message": string}`.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use shop_core::ShopError;

/// Uniform response wrapper
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T: Serialize> Envelope<T> {
    /// Successful response carrying `data`
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Error half of every handler result
#[derive(Debug)]
pub struct ApiError(pub ShopError);

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Failure envelope; only a rejected cart carries data
    pub fn envelope(&self) -> Envelope<Value> {
        Envelope {
            success: false,
            data: self
                .0
                .cart_errors()
                .map(|errors| serde_json::json!({ "errores": errors })),
            message: self.0.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

/// Result type for enveloped handlers
pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// Request body parsed as JSON.
///
/// A missing or unparseable body becomes `null`, so each handler reports its
/// own "missing field" message instead of a generic parse error.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|_| {
            ApiError(ShopError::MalformedInput(
                "No se pudo leer el cuerpo de la petición.".to_string(),
            ))
        })?;

        Ok(JsonBody(serde_json::from_slice(&bytes).unwrap_or(Value::Null)))
    }
}
