//! Storage infrastructure: settings file persistence.
//!
//! The `config` sub-module handles:
//!
//! - Reading `eyetrack_settings.json`, falling back to
//!   `eyetrack_settings.backup` and then to defaults when the JSON is broken.
//! - Writing changes back to disk, first copying the last known-good file to
//!   the backup path.
//!
//! Keeping file access here means the schema in [`crate::domain`] can be
//! built and tested without touching the file system.

pub mod config;
