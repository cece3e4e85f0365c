use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ControlMode;

/// Gesture name -> action string, as served by `GET /gestures`. The name is
/// the unique key; the backend owns the mapping and the client only ever
/// holds a copy rebuilt on fetch.
pub type GestureMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub name: String,
    pub time: String,
}

/// Point-in-time backend state from `GET /status`.
///
/// Every field defaults: the backend may answer with a reduced body such as
/// `{"recording": false, "model_loaded": false}` before the detector has
/// written a full snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub camera_on: bool,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub recording: bool,
    #[serde(default)]
    pub control_active: bool,
    #[serde(default)]
    pub action_log: Vec<ActionLogEntry>,
}

impl StatusSnapshot {
    /// Confidence as a whole percentage, clamped into 0..=100.
    pub fn confidence_pct(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    pub fn last_action(&self) -> Option<&ActionLogEntry> {
        self.action_log.last()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRecordingRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGestureRequest {
    pub name: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteGestureRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetModeRequest {
    pub mode: ControlMode,
}

/// Ad hoc acknowledgement body the backend returns from its POST endpoints,
/// e.g. `{"status": "recording command sent"}` or
/// `{"message": "Gesture saved", ...}`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AckResponse {
    /// The retrain endpoint reports failure inside a 2xx body as
    /// `{"status": "error", "message": ...}`.
    pub fn is_soft_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_snapshot_defaults_absent_fields() {
        let snapshot: StatusSnapshot =
            serde_json::from_str(r#"{"recording": false, "model_loaded": false}"#)
                .expect("reduced status body");
        assert!(!snapshot.camera_on);
        assert!(!snapshot.control_active);
        assert_eq!(snapshot.confidence, 0.0);
        assert!(snapshot.action_log.is_empty());
    }

    #[test]
    fn status_snapshot_decodes_full_body() {
        let snapshot: StatusSnapshot = serde_json::from_str(
            r#"{
                "camera_on": true,
                "model_loaded": true,
                "confidence": 0.87,
                "recording": true,
                "control_active": true,
                "action_log": [
                    {"name": "wave", "time": "12:00:01"},
                    {"name": "fist", "time": "12:00:05"}
                ]
            }"#,
        )
        .expect("full status body");
        assert_eq!(snapshot.confidence_pct(), 87);
        assert_eq!(snapshot.last_action().map(|entry| entry.name.as_str()), Some("fist"));
    }

    #[test]
    fn confidence_pct_clamps_out_of_range_values() {
        let mut snapshot = StatusSnapshot {
            confidence: 1.7,
            ..StatusSnapshot::default()
        };
        assert_eq!(snapshot.confidence_pct(), 100);
        snapshot.confidence = -0.3;
        assert_eq!(snapshot.confidence_pct(), 0);
    }

    #[test]
    fn ack_response_flags_soft_errors() {
        let ack: AckResponse =
            serde_json::from_str(r#"{"status": "error", "message": "no samples"}"#).expect("ack");
        assert!(ack.is_soft_error());
        let ack: AckResponse =
            serde_json::from_str(r#"{"status": "training complete"}"#).expect("ack");
        assert!(!ack.is_soft_error());
    }

    #[test]
    fn set_mode_request_serializes_wire_mode() {
        let body = serde_json::to_string(&SetModeRequest {
            mode: ControlMode::Control,
        })
        .expect("encode");
        assert_eq!(body, r#"{"mode":"control"}"#);
    }
}
