//! Numeric tolerance and rounding helpers shared by the engine

use crate::models::Money;

/// Remaining balances below this many currency units count as settled
pub const SETTLEMENT_EPSILON: f64 = 0.01;

/// Allowed absolute difference when comparing derived totals
pub const CONSERVATION_TOLERANCE: f64 = 1e-6;

/// Relative floating-point drift allowed in the sum of a balance vector
pub const ACCUMULATION_TOLERANCE: f64 = 1e-9;

/// Round a real amount to currency precision (2 decimal places)
pub fn round_currency(amount: f64) -> f64 {
    Money::from_amount(amount).as_f64()
}

/// Whether a remaining balance is close enough to zero to drop
pub fn is_settled(amount: f64) -> bool {
    amount.abs() < SETTLEMENT_EPSILON
}

/// Whether two derived amounts agree within [`CONSERVATION_TOLERANCE`]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= CONSERVATION_TOLERANCE
}

/// Largest absolute drift accepted for balances built from `gross` money moved
pub fn conservation_bound(gross: f64) -> f64 {
    ACCUMULATION_TOLERANCE * gross.max(1.0)
}
