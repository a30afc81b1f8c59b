//! Repository implementations for database operations.

pub mod audit_log;
pub mod officer;

pub use audit_log::AuditLogRepository;
pub use officer::OfficerRepository;
