//! Repository for the append-only report audit log.
//!
//! Rows are only ever inserted. The schema rejects updates and deletes, and
//! `log_id` is assigned by the database in strictly increasing order across
//! all reports.

use chrono::Utc;
use domain::models::{AuditLogEntry, ChangeType, ReportChange, TIMESTAMP_FORMAT};
use sqlx::SqlitePool;

use crate::entities::AuditLogEntity;
use crate::metrics::QueryTimer;

/// Repository for audit log operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: SqlitePool,
}

impl AuditLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Appends one entry stamped with the current UTC time.
    ///
    /// Returns the assigned log id. Either the whole row is durable or
    /// nothing is written.
    pub async fn append(
        &self,
        report_id: &str,
        badge_number: &str,
        change_type: ChangeType,
        change_detail: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let timestamp = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();

        let timer = QueryTimer::new("append_audit_entry");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO audit_log (report_id, badge_number, change_type, timestamp, change_detail)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING log_id
            "#,
        )
        .bind(report_id)
        .bind(badge_number)
        .bind(change_type.as_str())
        .bind(&timestamp)
        .bind(change_detail)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        let log_id = result?;
        tracing::debug!(
            log_id,
            report_id,
            badge_number,
            change_type = %change_type,
            "Audit entry appended"
        );
        Ok(log_id)
    }

    /// Appends a typed change, storing the payload its variant dictates.
    pub async fn record(
        &self,
        report_id: &str,
        badge_number: &str,
        change: &ReportChange,
    ) -> Result<i64, sqlx::Error> {
        let payload = change.payload();
        self.append(
            report_id,
            badge_number,
            change.change_type(),
            Some(payload.text()),
        )
        .await
    }

    /// All entries of a report in log id order.
    pub async fn list_for_report(&self, report_id: &str) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AuditLogEntity>(
            r#"
            SELECT log_id, report_id, badge_number, change_type, timestamp, change_detail
            FROM audit_log
            WHERE report_id = ?1
            ORDER BY log_id
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    /// Entries of a report written by one officer, in log id order.
    pub async fn list_for_report_by_officer(
        &self,
        report_id: &str,
        badge_number: &str,
    ) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AuditLogEntity>(
            r#"
            SELECT log_id, report_id, badge_number, change_type, timestamp, change_detail
            FROM audit_log
            WHERE report_id = ?1 AND badge_number = ?2
            ORDER BY log_id
            "#,
        )
        .bind(report_id)
        .bind(badge_number)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    /// Whether any entry references the report id.
    pub async fn report_exists(&self, report_id: &str) -> Result<bool, sqlx::Error> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM audit_log WHERE report_id = ?1)",
        )
        .bind(report_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(found != 0)
    }
}

fn into_entries(rows: Vec<AuditLogEntity>) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
    rows.into_iter()
        .map(|row| AuditLogEntry::try_from(row).map_err(|e| sqlx::Error::Decode(e.into())))
        .collect()
}
