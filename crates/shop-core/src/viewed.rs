//! # Viewed Products
//!
//! Acknowledges that a user looked at a product. View history itself lives
//! in the browser; the server only checks the product exists and echoes a
//! normalized record back.

use crate::error::{ShopError, ShopResult};
use crate::order::fecha;
use crate::product::Catalog;
use crate::token::Identity;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed registration request
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRequest {
    pub product_id: Value,
    /// Unix seconds
    pub timestamp: i64,
}

impl ViewRequest {
    /// Read `{producto_id, timestamp?}`; a missing timestamp means `now`
    pub fn from_body(body: &Value, now: DateTime<Utc>) -> ShopResult<Self> {
        let product_id = body
            .get("producto_id")
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or_else(|| ShopError::MalformedInput("Falta producto_id.".to_string()))?;

        let timestamp = match body.get("timestamp").filter(|v| !v.is_null()) {
            None => now.timestamp(),
            Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid_timestamp)?,
            Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid_timestamp())?,
            Some(_) => return Err(invalid_timestamp()),
        };

        Ok(Self {
            product_id,
            timestamp,
        })
    }
}

fn invalid_timestamp() -> ShopError {
    ShopError::MalformedInput("timestamp inválido.".to_string())
}

/// Summary of the viewed product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewedProductSummary {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
}

/// Acknowledged view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewedProduct {
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
    #[serde(rename = "producto")]
    pub product: ViewedProductSummary,
    pub timestamp: i64,
    #[serde(rename = "fecha", with = "fecha")]
    pub viewed_at: DateTime<Utc>,
}

impl ViewedProduct {
    /// Resolve the requested product and build the record
    pub fn record(request: &ViewRequest, catalog: &Catalog, identity: &Identity) -> ShopResult<Self> {
        let product = lookup_id(&request.product_id)
            .and_then(|id| catalog.get(id))
            .ok_or_else(|| ShopError::NotFound("Producto no encontrado.".to_string()))?;

        let viewed_at = Utc
            .timestamp_opt(request.timestamp, 0)
            .single()
            .ok_or_else(invalid_timestamp)?;

        Ok(Self {
            user_id: identity.user_id,
            product: ViewedProductSummary {
                id: product.id,
                name: product.name.clone(),
                price: product.price,
            },
            timestamp: request.timestamp,
            viewed_at,
        })
    }
}

fn lookup_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::new().with_product(Product::new(5, "Tablet", 329.0, 3, 2))
    }

    fn eva() -> Identity {
        Identity {
            user_id: 4,
            username: "eva".into(),
        }
    }

    #[test]
    fn test_record_with_client_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let request = ViewRequest::from_body(&json!({"producto_id": 5, "timestamp": 1_700_000_000}), now).unwrap();
        let record = ViewedProduct::record(&request, &catalog(), &eva()).unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["usuario_id"], 4);
        assert_eq!(json["producto"]["nombre"], "Tablet");
        assert_eq!(json["producto"]["precio"], 329.0);
        assert_eq!(json["timestamp"], 1_700_000_000);
        assert_eq!(json["fecha"], "2023-11-14 22:13:20");
    }

    #[test]
    fn test_timestamp_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let request = ViewRequest::from_body(&json!({"producto_id": "5"}), now).unwrap();
        assert_eq!(request.timestamp, now.timestamp());
        assert!(ViewedProduct::record(&request, &catalog(), &eva()).is_ok());
    }

    #[test]
    fn test_missing_product_id() {
        let err = ViewRequest::from_body(&json!({"timestamp": 1}), Utc::now()).unwrap_err();
        assert_eq!(err, ShopError::MalformedInput("Falta producto_id.".into()));
        assert!(ViewRequest::from_body(&json!({"producto_id": null}), Utc::now()).is_err());
    }

    #[test]
    fn test_unknown_product_is_not_found() {
        let request = ViewRequest::from_body(&json!({"producto_id": 99}), Utc::now()).unwrap();
        let err = ViewedProduct::record(&request, &catalog(), &eva()).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_bad_timestamp() {
        let err = ViewRequest::from_body(&json!({"producto_id": 5, "timestamp": "ayer"}), Utc::now())
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
