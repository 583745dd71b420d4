//! Core types and shared functionality for forum-harvest.
//!
//! This crate provides:
//! - The persisted post record and its JSON store
//! - Deduplication keys for records
//! - Session (cookie) state persistence
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod dedup;
pub mod error;
pub mod record;
pub mod session;
pub mod store;

pub use config::{AppConfig, ConfigError, DateLocaleName};
pub use dedup::{DedupKey, SeenKeys};
pub use error::Error;
pub use record::PostRecord;
pub use session::{SessionState, StoredCookie};
pub use store::RecordStore;
