//! Export module for roomsplit
//!
//! Provides complete data export functionality in multiple formats:
//! - CSV: expenses, readable by the importer and spreadsheets
//! - JSON: machine-readable full export including the settlement
//! - YAML: human-readable full export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{escape_csv, export_expenses_csv};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
