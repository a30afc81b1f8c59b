//! Domain models for the report assistant.

pub mod audit_log;
pub mod evidence;
pub mod officer;
pub mod report;

pub use audit_log::{
    AuditLogEntry, ChangePayload, ChangeType, ReportChange, MANUAL_EDIT_MARKER, TIMESTAMP_FORMAT,
};
pub use evidence::{EvidenceError, EvidenceFile, MediaKind};
pub use officer::{NewOfficer, Officer, OfficerIdentity};
pub use report::{ReportSession, ReportState, TransitionError};
