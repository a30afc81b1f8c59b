//! Persistence layer for the report assistant backend.
//!
//! This crate contains:
//! - Database connection management and embedded migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations for the credential store and audit log

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
