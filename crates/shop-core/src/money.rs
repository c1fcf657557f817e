//! # Money Helpers
//!
//! Prices travel as decimal numbers on the wire but are compared in integer
//! cents, so `19.99` and `19.990000001` land on the same value. Subtotals and
//! the order total are summed as `f64` and rounded to two decimals once.

/// Number of decimal places every price is rounded to
pub const DECIMAL_PLACES: u8 = 2;

/// Convert a decimal amount to cents, rounding half away from zero
pub fn to_cents(amount: f64) -> i64 {
    let multiplier = 10_f64.powi(DECIMAL_PLACES as i32);
    (amount * multiplier).round() as i64
}

/// Convert cents back to a decimal amount
pub fn from_cents(cents: i64) -> f64 {
    let divisor = 10_f64.powi(DECIMAL_PLACES as i32);
    cents as f64 / divisor
}

/// Round a decimal amount to two places
pub fn round2(amount: f64) -> f64 {
    from_cents(to_cents(amount))
}

/// True when both amounts are equal once rounded to two decimals
pub fn same_price(a: f64, b: f64) -> bool {
    to_cents(a) == to_cents(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_conversion() {
        assert_eq!(to_cents(10.99), 1099);
        assert_eq!(from_cents(1099), 10.99);
        assert_eq!(to_cents(2299.99), 229999);
        assert_eq!(to_cents(0.0), 0);
    }

    #[test]
    fn test_representation_noise_is_ignored() {
        assert!(same_price(19.99, 19.990000001));
        assert!(same_price(19.99, 19.994));
        assert!(!same_price(19.99, 19.98));
        assert!(!same_price(19.99, 1.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }
}
