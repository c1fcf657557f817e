//! # Order Types
//!
//! Orders synthesized from a validated cart. An order is a write-once value
//! handed back to the caller; nothing here persists it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cart line after every check passed. Prices are the catalog's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineValidated {
    pub id: i64,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "cantidad")]
    pub quantity: i64,

    /// Catalog price at validation time, never the client's
    #[serde(rename = "precio_unitario")]
    pub unit_price: f64,

    /// `unit_price × quantity`, rounded to two decimals
    pub subtotal: f64,
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Confirmado,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Confirmado
    }
}

/// A confirmed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "numero_pedido")]
    pub number: String,

    #[serde(rename = "usuario_id")]
    pub user_id: i64,

    #[serde(rename = "usuario_nombre")]
    pub username: String,

    #[serde(rename = "fecha", with = "fecha")]
    pub created_at: DateTime<Utc>,

    /// Lines in the order the client submitted them
    #[serde(rename = "productos")]
    pub lines: Vec<CartLineValidated>,

    pub total: f64,

    #[serde(rename = "estado", default)]
    pub status: OrderStatus,
}

impl Order {
    /// Total units across all lines
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Build an order number: `PED-<unix seconds>-<user id>-<8 random hex chars>`.
///
/// The random suffix keeps two orders from the same user in the same second apart.
pub fn generate_order_number(user_id: i64, at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("PED-{}-{}-{}", at.timestamp(), user_id, &suffix[..8])
}

/// `YYYY-MM-DD HH:MM:SS` timestamps, as the storefront displays them
pub mod fecha {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn format(at: &DateTime<Utc>) -> String {
        at.format(FORMAT).to_string()
    }

    pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(at))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn sample_order() -> Order {
        Order {
            number: "PED-1-1-abcdef01".into(),
            user_id: 1,
            username: "ana".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            lines: vec![CartLineValidated {
                id: 4,
                name: "Teclado".into(),
                quantity: 2,
                unit_price: 49.5,
                subtotal: 99.0,
            }],
            total: 99.0,
            status: OrderStatus::Confirmado,
        }
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(sample_order()).unwrap();
        assert_eq!(json["numero_pedido"], "PED-1-1-abcdef01");
        assert_eq!(json["usuario_nombre"], "ana");
        assert_eq!(json["fecha"], "2024-03-09 14:05:07");
        assert_eq!(json["estado"], "confirmado");
        assert_eq!(json["productos"][0]["precio_unitario"], 49.5);
        assert_eq!(json["productos"][0]["cantidad"], 2);

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample_order());
    }

    #[test]
    fn test_item_count() {
        assert_eq!(sample_order().item_count(), 2);
    }

    #[test]
    fn test_order_numbers_do_not_collide_within_a_second() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let numbers: HashSet<String> = (0..500).map(|_| generate_order_number(7, at)).collect();
        assert_eq!(numbers.len(), 500);
        assert!(numbers.iter().all(|n| n.starts_with("PED-1704067200-7-")));
    }
}
