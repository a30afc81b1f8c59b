//! Report audit trail domain models.
//!
//! Every mutation of a report draft is recorded as one immutable entry. The
//! detail column carries one of two payload shapes, fixed by the change type:
//! a full snapshot of the draft text, or a short marker.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Storage and wire format for audit timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Marker recorded for manual text edits.
pub const MANUAL_EDIT_MARKER: &str = "Changes saved manually.";

/// Kinds of change recorded against a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    InitialDraft,
    ManualEdit,
    AudioCorrection,
    FinalAffirmation,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::InitialDraft => "initial_draft",
            ChangeType::ManualEdit => "manual_edit",
            ChangeType::AudioCorrection => "audio_correction",
            ChangeType::FinalAffirmation => "final_affirmation",
        }
    }

    /// Whether entries of this type carry the full draft text.
    pub fn carries_snapshot(&self) -> bool {
        matches!(self, ChangeType::InitialDraft | ChangeType::FinalAffirmation)
    }
}

impl FromStr for ChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial_draft" => Ok(ChangeType::InitialDraft),
            "manual_edit" => Ok(ChangeType::ManualEdit),
            "audio_correction" => Ok(ChangeType::AudioCorrection),
            "final_affirmation" => Ok(ChangeType::FinalAffirmation),
            _ => Err(format!("Unknown change type: {}", s)),
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured detail of an audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ChangePayload {
    /// Complete draft text at the time of the change.
    FullSnapshot(String),
    /// Short description of the change; never the draft itself.
    MarkerOnly(String),
}

impl ChangePayload {
    /// Rebuilds the payload from a stored row.
    pub fn from_stored(change_type: ChangeType, detail: Option<String>) -> Self {
        let detail = detail.unwrap_or_default();
        if change_type.carries_snapshot() {
            ChangePayload::FullSnapshot(detail)
        } else {
            ChangePayload::MarkerOnly(detail)
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ChangePayload::FullSnapshot(text) | ChangePayload::MarkerOnly(text) => text,
        }
    }
}

/// A change about to be recorded. Each variant fixes its payload shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportChange {
    InitialDraft { draft: String },
    ManualEdit,
    AudioCorrection { file_name: String },
    FinalAffirmation { report: String },
}

impl ReportChange {
    pub fn change_type(&self) -> ChangeType {
        match self {
            ReportChange::InitialDraft { .. } => ChangeType::InitialDraft,
            ReportChange::ManualEdit => ChangeType::ManualEdit,
            ReportChange::AudioCorrection { .. } => ChangeType::AudioCorrection,
            ReportChange::FinalAffirmation { .. } => ChangeType::FinalAffirmation,
        }
    }

    pub fn payload(&self) -> ChangePayload {
        match self {
            ReportChange::InitialDraft { draft } => ChangePayload::FullSnapshot(draft.clone()),
            ReportChange::ManualEdit => ChangePayload::MarkerOnly(MANUAL_EDIT_MARKER.to_string()),
            ReportChange::AudioCorrection { file_name } => {
                ChangePayload::MarkerOnly(format!("Correction audio: {}", file_name))
            }
            ReportChange::FinalAffirmation { report } => {
                ChangePayload::FullSnapshot(report.clone())
            }
        }
    }
}

/// One immutable record in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub log_id: i64,
    pub report_id: String,
    pub badge_number: String,
    pub change_type: ChangeType,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub detail: ChangePayload,
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_change_type_string_roundtrip() {
        for change_type in [
            ChangeType::InitialDraft,
            ChangeType::ManualEdit,
            ChangeType::AudioCorrection,
            ChangeType::FinalAffirmation,
        ] {
            assert_eq!(ChangeType::from_str(change_type.as_str()).unwrap(), change_type);
        }
        assert!(ChangeType::from_str("Initial AI Draft").is_err());
    }

    #[test]
    fn test_snapshot_types() {
        assert!(ChangeType::InitialDraft.carries_snapshot());
        assert!(ChangeType::FinalAffirmation.carries_snapshot());
        assert!(!ChangeType::ManualEdit.carries_snapshot());
        assert!(!ChangeType::AudioCorrection.carries_snapshot());
    }

    #[test]
    fn test_report_change_payload_shapes() {
        let initial = ReportChange::InitialDraft {
            draft: "Incident Summary: ...".to_string(),
        };
        assert_eq!(initial.change_type(), ChangeType::InitialDraft);
        assert_eq!(
            initial.payload(),
            ChangePayload::FullSnapshot("Incident Summary: ...".to_string())
        );

        assert_eq!(
            ReportChange::ManualEdit.payload(),
            ChangePayload::MarkerOnly(MANUAL_EDIT_MARKER.to_string())
        );

        let correction = ReportChange::AudioCorrection {
            file_name: "fix.wav".to_string(),
        };
        assert_eq!(correction.change_type(), ChangeType::AudioCorrection);
        assert_eq!(correction.payload().text(), "Correction audio: fix.wav");
    }

    #[test]
    fn test_payload_from_stored_follows_change_type() {
        let payload =
            ChangePayload::from_stored(ChangeType::FinalAffirmation, Some("final".to_string()));
        assert_eq!(payload, ChangePayload::FullSnapshot("final".to_string()));

        let payload = ChangePayload::from_stored(ChangeType::ManualEdit, None);
        assert_eq!(payload, ChangePayload::MarkerOnly(String::new()));
    }

    #[test]
    fn test_entry_serialization() {
        let entry = AuditLogEntry {
            log_id: 42,
            report_id: "AB12CD34".to_string(),
            badge_number: "1001".to_string(),
            change_type: ChangeType::AudioCorrection,
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 9)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
            detail: ChangePayload::MarkerOnly("Correction audio: fix.wav".to_string()),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["logId"], 42);
        assert_eq!(json["changeType"], "audio_correction");
        assert_eq!(json["timestamp"], "2024-03-09 14:05:00");
        assert_eq!(json["detail"]["kind"], "marker_only");
        assert_eq!(json["detail"]["text"], "Correction audio: fix.wav");

        let parsed: AuditLogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, entry);
    }
}
