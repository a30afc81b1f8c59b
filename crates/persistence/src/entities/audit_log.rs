//! Audit log entity.

use domain::models::{AuditLogEntry, ChangePayload, ChangeType, TIMESTAMP_FORMAT};
use sqlx::FromRow;
use std::str::FromStr;

/// Database row mapping for the audit_log table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub log_id: i64,
    pub report_id: String,
    pub badge_number: String,
    /// Snake-case change type name.
    pub change_type: String,
    /// UTC, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Full draft or marker text, depending on change type.
    pub change_detail: Option<String>,
}

impl TryFrom<AuditLogEntity> for AuditLogEntry {
    type Error = String;

    fn try_from(entity: AuditLogEntity) -> Result<Self, Self::Error> {
        let change_type = ChangeType::from_str(&entity.change_type)?;
        let timestamp = chrono::NaiveDateTime::parse_from_str(&entity.timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| format!("Invalid timestamp '{}': {}", entity.timestamp, e))?;

        Ok(Self {
            log_id: entity.log_id,
            report_id: entity.report_id,
            badge_number: entity.badge_number,
            change_type,
            timestamp,
            detail: ChangePayload::from_stored(change_type, entity.change_detail),
        })
    }
}
