//! YAML Export functionality
//!
//! The same full export as JSON, in a form that is easier to read by hand.

use std::io::Write;

use crate::error::{SplitError, SplitResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> SplitResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = [
        "# roomsplit Full Export".to_string(),
        format!("# Generated: {}", export.exported_at),
        format!("# App Version: {}", export.app_version),
        format!(
            "# {} people, {} expenses, {} transfers to settle",
            export.metadata.person_count,
            export.metadata.expense_count,
            export.metadata.transfer_count
        ),
        String::new(),
    ];
    for line in &header {
        writeln!(writer, "{}", line).map_err(|e| SplitError::Export(e.to_string()))?;
    }

    serde_yaml::to_writer(writer, &export).map_err(|e| SplitError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a YAML export, checking its integrity
pub fn import_from_yaml(yaml_str: &str) -> SplitResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| SplitError::Import(e.to_string()))?;

    export.validate().map_err(SplitError::Import)?;

    Ok(export)
}
