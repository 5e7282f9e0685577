//! CSV import of expenses
//!
//! Columns are located by header name (case-insensitive):
//!
//! | column         | aliases          | required |
//! |----------------|------------------|----------|
//! | `date`         |                  | yes      |
//! | `amount`       | `inr`, `total`   | yes      |
//! | `category`     |                  | no       |
//! | `payer`        | `paid by`        | no       |
//! | `participants` | `split`, `shared`| no       |
//! | `note`         | `memo`           | no       |
//! | `account`      |                  | no       |
//!
//! Participants are separated by `;` and may be names or ids; `all` or `*`
//! means everyone in the household. Rows without a payer are rejected unless
//! random assignment is enabled, in which case payer and participants are
//! drawn from a seeded [`RandomAssigner`].

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{SplitError, SplitResult};
use crate::models::{ExpenseId, ExpenseRecord, Person, PersonId};
use crate::storage::Storage;

use super::seed::RandomAssigner;
use super::{find_by_short_id, ExpenseService, PersonService};

/// Column positions found in the header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: usize,
    pub amount: usize,
    pub category: Option<usize>,
    pub payer: Option<usize>,
    pub participants: Option<usize>,
    pub note: Option<usize>,
    pub account: Option<usize>,
}

impl ColumnMapping {
    /// Locate columns by header name
    pub fn from_headers(headers: &StringRecord) -> SplitResult<Self> {
        let mut date = None;
        let mut amount = None;
        let mut mapping = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            match header.trim().to_lowercase().as_str() {
                "date" => date = Some(idx),
                "amount" | "inr" | "total" => amount = Some(idx),
                "category" => mapping.category = Some(idx),
                "payer" | "paid by" => mapping.payer = Some(idx),
                "participants" | "split" | "shared" => mapping.participants = Some(idx),
                "note" | "memo" => mapping.note = Some(idx),
                "account" => mapping.account = Some(idx),
                _ => {}
            }
        }

        mapping.date =
            date.ok_or_else(|| SplitError::Import("CSV header has no 'date' column".into()))?;
        mapping.amount =
            amount.ok_or_else(|| SplitError::Import("CSV header has no 'amount' column".into()))?;
        Ok(mapping)
    }
}

/// Import behaviour
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Preferred date format; ISO dates are always accepted
    pub date_format: String,
    pub delimiter: u8,
    /// Seed for assigning payer/participants to rows that lack them
    pub assign_seed: Option<u64>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            delimiter: b',',
            assign_seed: None,
        }
    }
}

impl ImportOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            date_format: settings.date_format.clone(),
            ..Self::default()
        }
    }
}

/// A CSV row parsed into an expense, not yet stored
#[derive(Debug, Clone)]
pub struct ParsedExpense {
    /// Line number in the file (the header is line 1)
    pub line: usize,
    pub expense: ExpenseRecord,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub imported_ids: Vec<ExpenseId>,
    /// Error message per file line
    pub errors: BTreeMap<usize, String>,
}

impl ImportResult {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Parse every row, keeping per-row failures instead of stopping
    pub fn parse<R: Read>(
        &self,
        input: R,
        options: &ImportOptions,
    ) -> SplitResult<Vec<Result<ParsedExpense, (usize, String)>>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(options.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| SplitError::Import(format!("Failed to read CSV header: {}", e)))?
            .clone();
        let mapping = ColumnMapping::from_headers(&headers)?;

        let people = PersonService::new(self.storage).list()?;
        let everyone: Vec<PersonId> = people.iter().map(|p| p.id).collect();
        let mut assigner = options.assign_seed.map(RandomAssigner::from_seed);

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let line = idx + 2;
            let parsed = match record {
                Ok(record) => self
                    .parse_record(&record, &mapping, options, &people, &everyone, assigner.as_mut())
                    .map(|expense| ParsedExpense { line, expense }),
                Err(e) => Err(format!("Error reading CSV record: {}", e)),
            };
            rows.push(parsed.map_err(|message| (line, message)));
        }

        Ok(rows)
    }

    /// Parse and store all valid rows
    pub fn import<R: Read>(&self, input: R, options: &ImportOptions) -> SplitResult<ImportResult> {
        let rows = self.parse(input, options)?;
        let expense_service = ExpenseService::new(self.storage, self.settings);
        let mut result = ImportResult::default();

        for row in rows {
            match row {
                Ok(parsed) => match expense_service.add(parsed.expense) {
                    Ok(expense) => {
                        result.imported += 1;
                        result.imported_ids.push(expense.id);
                    }
                    Err(e) => {
                        result.errors.insert(parsed.line, e.to_string());
                    }
                },
                Err((line, message)) => {
                    result.errors.insert(line, message);
                }
            }
        }

        if !result.is_clean() {
            warn!(errors = result.error_count(), "some rows were not imported");
        }
        info!(imported = result.imported, "csv import finished");
        Ok(result)
    }

    /// Import from a file on disk
    pub fn import_file(&self, path: &Path, options: &ImportOptions) -> SplitResult<ImportResult> {
        let file = std::fs::File::open(path).map_err(|e| {
            SplitError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.import(file, options)
    }

    fn parse_record(
        &self,
        record: &StringRecord,
        mapping: &ColumnMapping,
        options: &ImportOptions,
        people: &[Person],
        everyone: &[PersonId],
        assigner: Option<&mut RandomAssigner>,
    ) -> Result<ExpenseRecord, String> {
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        let date = parse_date(cell(Some(mapping.date)), &options.date_format)?;
        let amount = parse_amount(cell(Some(mapping.amount)))?;

        let category = match cell(mapping.category) {
            "" => self.settings.default_category.clone(),
            category => category.to_string(),
        };

        let payer = match cell(mapping.payer) {
            "" => None,
            name => Some(resolve(people, name)?),
        };
        let participants = match cell(mapping.participants) {
            "" => None,
            list => Some(resolve_list(people, everyone, list)?),
        };

        let (payer, participants) = match (payer, participants, assigner) {
            (Some(payer), Some(participants), _) => (payer, participants),
            (Some(payer), None, Some(assigner)) => (payer, assigner.participants(everyone, payer)),
            (Some(payer), None, None) => (payer, BTreeSet::new()),
            (None, participants, Some(assigner)) => {
                let payer = assigner
                    .payer(everyone)
                    .ok_or_else(|| "No people to assign as payer".to_string())?;
                let participants =
                    participants.unwrap_or_else(|| assigner.participants(everyone, payer));
                (payer, participants)
            }
            (None, _, None) => return Err("Missing payer".to_string()),
        };

        let mut expense = ExpenseRecord::new(amount, payer, participants, category, date);
        expense.note = cell(mapping.note).to_string();
        expense.account = cell(mapping.account).to_string();
        Ok(expense)
    }
}

/// Resolve a person by name, full id, or short id
fn resolve(people: &[Person], identifier: &str) -> Result<PersonId, String> {
    if let Some(person) = people.iter().find(|p| p.matches_name(identifier)) {
        return Ok(person.id);
    }

    if let Ok(id) = identifier.parse::<PersonId>() {
        if people.iter().any(|p| p.id == id) {
            return Ok(id);
        }
    }

    match find_by_short_id(people.iter().collect(), identifier, PersonId::PREFIX, |p: &&Person| {
        *p.id.as_uuid()
    }) {
        Ok(Some(person)) => Ok(person.id),
        _ => Err(format!("Unknown person '{}'", identifier)),
    }
}

fn resolve_list(
    people: &[Person],
    everyone: &[PersonId],
    list: &str,
) -> Result<BTreeSet<PersonId>, String> {
    if list.eq_ignore_ascii_case("all") || list == "*" {
        return Ok(everyone.iter().copied().collect());
    }

    list.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| resolve(people, name))
        .collect()
}

fn parse_date(s: &str, primary_format: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, primary_format) {
        return Ok(date);
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    Err(format!("Could not parse date: '{}'", s))
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    cleaned
        .parse::<f64>()
        .map_err(|_| format!("Could not parse amount '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomsplitPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RoomsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        for name in ["Alice", "Bob", "Carol"] {
            storage.people.upsert(Person::new(name)).unwrap();
        }
        (temp_dir, storage)
    }

    #[test]
    fn test_column_mapping() {
        let headers = StringRecord::from(vec!["Date", "Category", "INR", "Paid By", "Note"]);
        let mapping = ColumnMapping::from_headers(&headers).unwrap();

        assert_eq!(mapping.date, 0);
        assert_eq!(mapping.amount, 2);
        assert_eq!(mapping.payer, Some(3));
        assert_eq!(mapping.note, Some(4));
        assert_eq!(mapping.participants, None);

        let missing = StringRecord::from(vec!["Category", "Amount"]);
        assert!(matches!(
            ColumnMapping::from_headers(&missing),
            Err(SplitError::Import(_))
        ));
    }

    #[test]
    fn test_import_collects_row_errors() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ImportService::new(&storage, &settings);

        let csv = "\
date,category,amount,payer,participants,note
2025-01-03,Groceries,$45.00,Alice,Alice;Bob;Carol,weekly shop
2025-01-04,Rent,900,bob,all,
not-a-date,Snacks,3,Alice,Alice,
2025-01-05,Snacks,abc,Alice,Alice,
2025-01-06,Snacks,4,Zed,Alice,
2025-01-07,Snacks,-4,Alice,Alice,
2025-01-08,Snacks,4,Alice,,
";

        let result = service.import(csv.as_bytes(), &ImportOptions::default()).unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.error_count(), 5);
        assert!(result.errors[&4].contains("date"));
        assert!(result.errors[&5].contains("amount"));
        assert!(result.errors[&6].contains("Zed"));
        assert!(result.errors[&7].contains("non-negative"));
        assert!(result.errors[&8].contains("participant"));

        let expenses = storage.expenses.get_all().unwrap();
        assert_eq!(expenses[0].amount, 45.0);
        assert_eq!(expenses[0].note, "weekly shop");
        assert_eq!(expenses[1].participants.len(), 3);
    }

    #[test]
    fn test_random_assignment_for_missing_payers() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ImportService::new(&storage, &settings);

        let csv = "\
Date,Account,Category,Amount,Note
05/01/2025,Cash,Food,12.5,
05/02/2025,Card,,30,
";
        let options = ImportOptions {
            date_format: "%m/%d/%Y".into(),
            assign_seed: Some(11),
            ..ImportOptions::default()
        };

        let result = service.import(csv.as_bytes(), &options).unwrap();
        assert!(result.is_clean());
        assert_eq!(result.imported, 2);

        let expenses = storage.expenses.get_all().unwrap();
        assert_eq!(expenses[0].account, "Cash");
        assert_eq!(expenses[1].category, "General");
        assert!(expenses
            .iter()
            .all(|e| e.participants.contains(&e.payer)));
    }

    #[test]
    fn test_missing_payer_without_assignment() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ImportService::new(&storage, &settings);

        let rows = service
            .parse("date,amount\n2025-02-01,10\n".as_bytes(), &ImportOptions::default())
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().unwrap_err().1, "Missing payer");
    }
}
