//! Configuration module for roomsplit
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::RoomsplitPaths;
pub use settings::Settings;
