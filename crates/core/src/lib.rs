//! Core types and shared functionality for linkpreview.
//!
//! This crate provides:
//! - The preview record data model
//! - File-backed metadata cache keyed by URL digest
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod record;

pub use cache::{MetadataCache, StoreOutcome};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use record::PreviewRecord;
