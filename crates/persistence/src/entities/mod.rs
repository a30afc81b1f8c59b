//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod audit_log;
pub mod officer;

pub use audit_log::AuditLogEntity;
pub use officer::OfficerEntity;
