//! Demo data generation
//!
//! Random payer and participant assignment uses a seeded [`StdRng`], so the
//! same seed always produces the same ledger shape.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::Settings;
use crate::error::{SplitError, SplitResult};
use crate::models::{ExpenseRecord, PersonId};
use crate::storage::Storage;

use super::{ExpenseService, PersonService};

/// Categories used for generated expenses
pub const DEMO_CATEGORIES: &[&str] = &[
    "Groceries",
    "Rent",
    "Utilities",
    "Internet",
    "Household",
    "Dining Out",
    "Entertainment",
    "Transportation",
];

/// Names used when no people are given
pub const DEMO_PEOPLE: &[&str] = &["Alice", "Bob", "Charlie", "David"];

/// Random payer/participant assignment over a fixed seed
pub struct RandomAssigner {
    rng: StdRng,
}

impl RandomAssigner {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a payer, `None` for an empty household
    pub fn payer(&mut self, people: &[PersonId]) -> Option<PersonId> {
        people.choose(&mut self.rng).copied()
    }

    /// The payer plus each other person with even odds
    pub fn participants(&mut self, people: &[PersonId], payer: PersonId) -> BTreeSet<PersonId> {
        let mut participants = BTreeSet::from([payer]);
        for &person in people {
            if person != payer && self.rng.gen_bool(0.5) {
                participants.insert(person);
            }
        }
        participants
    }

    /// Amount between 1.00 and `max` in whole cents
    pub fn amount(&mut self, max: f64) -> f64 {
        let max_cents = (max * 100.0).round().max(100.0) as i64;
        self.rng.gen_range(100..=max_cents) as f64 / 100.0
    }

    pub fn category(&mut self) -> &'static str {
        DEMO_CATEGORIES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("General")
    }

    /// A date within `days` days after `start`
    pub fn date(&mut self, start: NaiveDate, days: u32) -> NaiveDate {
        let offset = self.rng.gen_range(0..=u64::from(days));
        start.checked_add_days(Days::new(offset)).unwrap_or(start)
    }
}

/// What to generate
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub seed: u64,
    /// People to create (existing names are reused)
    pub people: Vec<String>,
    pub expenses: usize,
    pub start: NaiveDate,
    /// Span of days the generated dates fall in
    pub days: u32,
    pub max_amount: f64,
}

impl SeedOptions {
    pub fn new(seed: u64, start: NaiveDate) -> Self {
        Self {
            seed,
            people: DEMO_PEOPLE.iter().map(|s| s.to_string()).collect(),
            expenses: 20,
            start,
            days: 30,
            max_amount: 200.0,
        }
    }
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Default)]
pub struct SeedSummary {
    pub people_created: usize,
    pub people_reused: usize,
    pub expenses_created: usize,
}

/// Populate storage with a demo household
pub fn seed_demo_data(
    storage: &Storage,
    settings: &Settings,
    options: &SeedOptions,
) -> SplitResult<SeedSummary> {
    if options.people.is_empty() {
        return Err(SplitError::Validation(
            "At least one person is needed to seed expenses".into(),
        ));
    }

    let person_service = PersonService::new(storage);
    let expense_service = ExpenseService::new(storage, settings);
    let mut summary = SeedSummary::default();

    let mut ids = Vec::with_capacity(options.people.len());
    for name in &options.people {
        let person = match person_service.find(name)? {
            Some(existing) => {
                summary.people_reused += 1;
                existing
            }
            None => {
                summary.people_created += 1;
                person_service.create(name, None, None)?
            }
        };
        ids.push(person.id);
    }
    ids.sort();
    ids.dedup();

    let mut assigner = RandomAssigner::from_seed(options.seed);
    for _ in 0..options.expenses {
        let Some(payer) = assigner.payer(&ids) else {
            break;
        };
        let participants = assigner.participants(&ids, payer);
        let amount = assigner.amount(options.max_amount);
        let category = assigner.category();
        let date = assigner.date(options.start, options.days);

        let mut expense = ExpenseRecord::new(amount, payer, participants, category, date);
        expense.note = "demo".to_string();
        expense_service.add(expense)?;
        summary.expenses_created += 1;
    }

    info!(
        seed = options.seed,
        people = ids.len(),
        expenses = summary.expenses_created,
        "demo data seeded"
    );
    Ok(summary)
}
