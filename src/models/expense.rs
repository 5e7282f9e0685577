//! Expense model
//!
//! An expense is paid by one person and shared equally among its
//! participants. Category, date, note and account are carried through for
//! summaries and display; the balance math only looks at amount, payer and
//! participants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::{ExpenseId, PersonId};

/// A single shared expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Unique identifier
    pub id: ExpenseId,

    /// Total amount paid (non-negative)
    pub amount: f64,

    /// Who paid
    pub payer: PersonId,

    /// Who shares the cost, payer normally included
    pub participants: BTreeSet<PersonId>,

    /// Spending category (exact match, case-sensitive)
    pub category: String,

    /// Date the expense was incurred
    pub date: NaiveDate,

    /// Free-form note
    #[serde(default)]
    pub note: String,

    /// Account or payment method the money came from
    #[serde(default)]
    pub account: String,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    pub updated_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Create a new expense
    pub fn new(
        amount: f64,
        payer: PersonId,
        participants: impl IntoIterator<Item = PersonId>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            amount,
            payer,
            participants: participants.into_iter().collect(),
            category: category.into(),
            date,
            note: String::new(),
            account: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Equal share owed by each participant, `None` when nobody participates
    pub fn share(&self) -> Option<f64> {
        if self.participants.is_empty() {
            None
        } else {
            Some(self.amount / self.participants.len() as f64)
        }
    }

    /// Check if a person shares this expense
    pub fn involves(&self, person: PersonId) -> bool {
        self.payer == person || self.participants.contains(&person)
    }

    /// Validate the expense on its own, without knowledge of the group
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ExpenseValidationError::InvalidAmount(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyCategory);
        }

        if self.participants.is_empty() {
            return Err(ExpenseValidationError::NoParticipants);
        }

        Ok(())
    }

    /// Check that the payer is one of the participants
    pub fn validate_payer_participates(&self) -> Result<(), ExpenseValidationError> {
        if self.participants.contains(&self.payer) {
            Ok(())
        } else {
            Err(ExpenseValidationError::PayerNotParticipant(self.payer))
        }
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2} split {} ways",
            self.date,
            self.category,
            self.amount,
            self.participants.len()
        )
    }
}

/// Optional-field update for an expense; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub amount: Option<f64>,
    pub payer: Option<PersonId>,
    pub participants: Option<BTreeSet<PersonId>>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
    pub account: Option<String>,
}

impl ExpenseUpdate {
    /// Whether the update would change anything
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.payer.is_none()
            && self.participants.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.note.is_none()
            && self.account.is_none()
    }

    /// Apply the provided fields to an expense
    pub fn apply_to(&self, expense: &mut ExpenseRecord) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(payer) = self.payer {
            expense.payer = payer;
        }
        if let Some(participants) = &self.participants {
            expense.participants = participants.clone();
        }
        if let Some(category) = &self.category {
            expense.category = category.trim().to_string();
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(note) = &self.note {
            expense.note = note.clone();
        }
        if let Some(account) = &self.account {
            expense.account = account.clone();
        }
        expense.updated_at = Utc::now();
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseValidationError {
    InvalidAmount(f64),
    EmptyCategory,
    NoParticipants,
    PayerNotParticipant(PersonId),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(amount) => {
                write!(f, "Expense amount must be a non-negative number, got {}", amount)
            }
            Self::EmptyCategory => write!(f, "Expense category cannot be empty"),
            Self::NoParticipants => write!(f, "Expense must have at least one participant"),
            Self::PayerNotParticipant(id) => {
                write!(f, "Payer {} must be one of the participants", id)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
