//! # Cart Validation
//!
//! Recomputes a client-submitted cart against the catalog. The client cart
//! comes from browser storage and may have been edited, so only ids and
//! quantities are taken from it; prices are checked, never used.
//!
//! Every line is checked even after an earlier one fails. If any line fails,
//! the whole cart is rejected with the accumulated messages and no order is
//! produced.

use crate::error::{ShopError, ShopResult};
use crate::money;
use crate::order::{generate_order_number, CartLineValidated, Order, OrderStatus};
use crate::product::{Catalog, Product};
use crate::token::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One line as submitted by the client. Fields stay raw until checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartLineClient {
    #[serde(default)]
    pub id: Option<Value>,

    #[serde(rename = "cantidad", default)]
    pub quantity: Option<Value>,

    #[serde(rename = "precio", default)]
    pub price: Option<Value>,
}

impl CartLineClient {
    pub fn new(id: i64, quantity: i64, price: f64) -> Self {
        Self {
            id: Some(Value::from(id)),
            quantity: Some(Value::from(quantity)),
            price: Some(Value::from(price)),
        }
    }

    /// Read a line from arbitrary JSON; anything but an object has no fields
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Pull the `carrito` list out of a request body.
///
/// Fails fast when it is missing, not a list, or empty.
pub fn extract_lines(body: &Value) -> ShopResult<&[Value]> {
    let lines = body
        .get("carrito")
        .and_then(Value::as_array)
        .ok_or_else(ShopError::invalid_cart_format)?;

    if lines.is_empty() {
        return Err(ShopError::empty_cart());
    }
    Ok(lines.as_slice())
}

/// Stateless cart validator
#[derive(Debug, Clone, Copy, Default)]
pub struct CartValidator;

impl CartValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate `lines` against `catalog` and build an order for `identity`
    pub fn validate(
        &self,
        lines: &[Value],
        catalog: &Catalog,
        identity: &Identity,
    ) -> ShopResult<Order> {
        self.validate_at(lines, catalog, identity, Utc::now())
    }

    /// Same as [`CartValidator::validate`] with an explicit order time
    pub fn validate_at(
        &self,
        lines: &[Value],
        catalog: &Catalog,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> ShopResult<Order> {
        if lines.is_empty() {
            return Err(ShopError::empty_cart());
        }

        let mut errors = Vec::new();
        let mut validated = Vec::with_capacity(lines.len());
        let mut total = 0.0_f64;

        for raw in lines {
            match check_line(&CartLineClient::from_value(raw), catalog) {
                Ok((product, quantity)) => {
                    let exact = product.price * quantity as f64;
                    total += exact;
                    validated.push(CartLineValidated {
                        id: product.id,
                        name: product.name.clone(),
                        quantity,
                        unit_price: product.price,
                        subtotal: money::round2(exact),
                    });
                }
                Err(message) => errors.push(message),
            }
        }

        if !errors.is_empty() {
            debug!("Cart rejected with {} error(s)", errors.len());
            return Err(ShopError::CartRejected { errors });
        }

        Ok(Order {
            number: generate_order_number(identity.user_id, now),
            user_id: identity.user_id,
            username: identity.username.clone(),
            created_at: now,
            lines: validated,
            total: money::round2(total),
            status: OrderStatus::Confirmado,
        })
    }
}

/// Run the per-line checks in order; the first failure is the line's error
fn check_line<'a>(
    line: &CartLineClient,
    catalog: &'a Catalog,
) -> Result<(&'a Product, i64), String> {
    let (Some(id), Some(quantity), Some(price)) = (&line.id, &line.quantity, &line.price) else {
        return Err("Item con estructura inválida".to_string());
    };

    let product = as_integer(id)
        .and_then(|id| catalog.get(id))
        .ok_or_else(|| format!("Producto ID {} no existe", display_raw(id)))?;

    let price_matches = as_decimal(price)
        .map(|p| money::same_price(p, product.price))
        .unwrap_or(false);
    if !price_matches {
        return Err(format!(
            "Precio manipulado en producto '{}'. Precio real: €{}, precio enviado: €{}",
            product.name,
            product.price,
            as_decimal(price)
                .map(|p| p.to_string())
                .unwrap_or_else(|| display_raw(price))
        ));
    }

    let quantity = match as_integer(quantity) {
        Some(q) if q > 0 => q,
        _ => return Err(format!("Cantidad inválida para producto '{}'", product.name)),
    };

    if quantity > product.stock {
        return Err(format!(
            "Stock insuficiente para '{}'. Disponible: {}, solicitado: {}",
            product.name, product.stock, quantity
        ));
    }

    Ok((product, quantity))
}

/// Integers, integral floats and integer strings
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Numbers and numeric strings
fn as_decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn display_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
