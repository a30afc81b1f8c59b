//! Domain layer for the report assistant backend.
//!
//! This crate contains:
//! - Domain models (Officer, AuditLogEntry, ReportSession)
//! - The report session state machine
//! - Ports for the draft generator and report notifier

pub mod models;
pub mod services;
