//! Append-only audit log
//!
//! One JSON object per line (JSONL). Lines are only ever appended, so a
//! person's or expense's history can be replayed by reading the file in
//! order.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{SplitError, SplitResult};

use super::entry::{AuditEntry, EntityType};

/// Reads and appends entries in the household's audit log
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_for_append(&self) -> SplitResult<BufWriter<File>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| SplitError::Io(format!("Failed to open audit log: {}", e)))?;
        Ok(BufWriter::new(file))
    }

    fn append<W: Write>(writer: &mut W, entry: &AuditEntry) -> SplitResult<()> {
        let line = serde_json::to_string(entry)
            .map_err(|e| SplitError::Json(format!("Failed to serialize audit entry: {}", e)))?;
        writeln!(writer, "{}", line)
            .map_err(|e| SplitError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Append one entry and flush it to disk
    pub fn log(&self, entry: &AuditEntry) -> SplitResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush, e.g. one per imported row
    pub fn log_batch(&self, entries: &[AuditEntry]) -> SplitResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut writer = self.open_for_append()?;
        for entry in entries {
            Self::append(&mut writer, entry)?;
        }
        writer
            .flush()
            .map_err(|e| SplitError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> SplitResult<Vec<AuditEntry>> {
        self.read_matching(|_| true)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> SplitResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Entries touching one person or expense, identified as it was logged
    pub fn history(&self, entity_id: &str) -> SplitResult<Vec<AuditEntry>> {
        self.read_matching(|e| e.entity_id == entity_id)
    }

    /// Entries for one kind of entity
    pub fn read_by_type(&self, entity_type: EntityType) -> SplitResult<Vec<AuditEntry>> {
        self.read_matching(|e| e.entity_type == entity_type)
    }

    fn read_matching(&self, keep: impl Fn(&AuditEntry) -> bool) -> SplitResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| SplitError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                SplitError::Io(format!("Failed to read audit log line {}: {}", idx + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                SplitError::Json(format!("Failed to parse audit entry at line {}: {}", idx + 1, e))
            })?;
            if keep(&entry) {
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    /// Number of non-empty lines in the log
    pub fn entry_count(&self) -> SplitResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| SplitError::Io(format!("Failed to open audit log: {}", e)))?;

        Ok(BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count())
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn person_added(id: &str, name: &str) -> AuditEntry {
        AuditEntry::create(
            EntityType::Person,
            id,
            Some(name.to_string()),
            &json!({ "name": name }),
        )
    }

    #[test]
    fn test_log_and_read_back() {
        let (logger, _temp) = create_test_logger();

        logger.log(&person_added("per-00000001", "Alice")).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_name.as_deref(), Some("Alice"));
        assert_eq!(logger.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_batch_of_imported_expenses() {
        let (logger, _temp) = create_test_logger();

        let entries: Vec<AuditEntry> = (0..3)
            .map(|i| {
                AuditEntry::create(
                    EntityType::Expense,
                    format!("exp-{:08}", i),
                    None,
                    &json!({ "amount": 10.0 * f64::from(i) }),
                )
            })
            .collect();
        logger.log_batch(&entries).unwrap();
        logger.log_batch(&[]).unwrap();

        assert_eq!(logger.read_all().unwrap().len(), 3);
        assert_eq!(logger.read_by_type(EntityType::Expense).unwrap().len(), 3);
        assert!(logger.read_by_type(EntityType::Person).unwrap().is_empty());
    }

    #[test]
    fn test_read_recent_keeps_order() {
        let (logger, _temp) = create_test_logger();

        for i in 0..10 {
            logger
                .log(&person_added(&format!("per-{}", i), &format!("P{}", i)))
                .unwrap();
        }

        let ids: Vec<_> = logger
            .read_recent(3)
            .unwrap()
            .into_iter()
            .map(|e| e.entity_id)
            .collect();
        assert_eq!(ids, vec!["per-7", "per-8", "per-9"]);
        assert_eq!(logger.read_recent(50).unwrap().len(), 10);
    }

    #[test]
    fn test_history_of_one_expense() {
        let (logger, _temp) = create_test_logger();

        let before = json!({ "amount": 42.0 });
        let after = json!({ "amount": 45.5 });
        logger
            .log(&AuditEntry::create(EntityType::Expense, "exp-aaaa0000", None, &before))
            .unwrap();
        logger.log(&person_added("per-bbbb0000", "Bob")).unwrap();
        logger
            .log(&AuditEntry::update(
                EntityType::Expense,
                "exp-aaaa0000",
                None,
                &before,
                &after,
                Some("amount: 42.0 -> 45.5".to_string()),
            ))
            .unwrap();
        logger
            .log(&AuditEntry::delete(EntityType::Expense, "exp-aaaa0000", None, &after))
            .unwrap();

        let history = logger.history("exp-aaaa0000").unwrap();
        let ops: Vec<_> = history.iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
        assert!(history[2].after.is_none());
    }

    #[test]
    fn test_missing_log_is_empty() {
        let (logger, _temp) = create_test_logger();

        assert!(!logger.exists());
        assert_eq!(logger.entry_count().unwrap(), 0);
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_line_is_reported() {
        let (logger, temp) = create_test_logger();
        logger.log(&person_added("per-1", "Alice")).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(temp.path().join("audit.log"))
            .unwrap()
            .write_all(b"{not json\n")
            .unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
