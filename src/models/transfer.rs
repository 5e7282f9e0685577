//! Transfer model
//!
//! A single settlement payment: the debtor pays the creditor.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::PersonId;
use super::money::Money;

/// One payment that moves a debtor and a creditor toward zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Who pays
    pub debtor: PersonId,
    /// Who receives
    pub creditor: PersonId,
    /// Positive amount, rounded to cents
    pub amount: Money,
}

impl Transfer {
    pub fn new(debtor: PersonId, creditor: PersonId, amount: Money) -> Self {
        Self {
            debtor,
            creditor,
            amount,
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.debtor, self.creditor, self.amount)
    }
}
