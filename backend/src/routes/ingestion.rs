use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::SessionId;

/// Climb entry in a legacy batch upload.
///
/// Clients have sent both capitalised and snake_case keys over time; both
/// are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyClimbEntry {
    #[serde(rename = "Discipline", alias = "discipline", default)]
    pub discipline: Option<String>,
    #[serde(rename = "Grade", alias = "grade", default)]
    pub grade: Option<String>,
    #[serde(rename = "Timestamp", alias = "timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "Gym", alias = "gym", default)]
    pub gym: Option<String>,
    #[serde(
        rename = "AscentType",
        alias = "ascentType",
        alias = "ascent_type",
        default
    )]
    pub ascent_type: Option<String>,
    #[serde(rename = "Notes", alias = "notes", default)]
    pub notes: Option<String>,
}

/// Result of a legacy batch save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    pub session_name: String,
    pub session_date: NaiveDate,
    pub climbs_saved: usize,
}

/// A single climb logged into a running session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimbLog {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub climbing_type: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub ascent_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_entry_accepts_both_casings() {
        let upper: LegacyClimbEntry = serde_json::from_value(serde_json::json!({
            "Discipline": "Bouldering",
            "Grade": "V4",
            "Timestamp": "2024-05-01 19:00:00",
            "Gym": "Vital",
            "AscentType": "Flash"
        }))
        .unwrap();
        let lower: LegacyClimbEntry = serde_json::from_value(serde_json::json!({
            "discipline": "Bouldering",
            "grade": "V4",
            "timestamp": "2024-05-01 19:00:00",
            "gym": "Vital",
            "ascent_type": "Flash"
        }))
        .unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.ascent_type.as_deref(), Some("Flash"));
    }

    #[test]
    fn test_legacy_entry_optional_fields() {
        let entry: LegacyClimbEntry =
            serde_json::from_value(serde_json::json!({"Grade": "6a"})).unwrap();
        assert_eq!(entry.grade.as_deref(), Some("6a"));
        assert!(entry.discipline.is_none());
        assert!(entry.gym.is_none());
    }

    #[test]
    fn test_climb_log_session_id_is_numeric() {
        let log: ClimbLog = serde_json::from_value(serde_json::json!({
            "session_id": 12,
            "climbing_type": "Bouldering",
            "grade": "V2",
            "ascent_type": "Send"
        }))
        .unwrap();
        assert_eq!(log.session_id, Some(SessionId::new(12)));
        assert!(log.tags.is_none());
    }
}
