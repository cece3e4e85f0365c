use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body shapes the backend emits: FastAPI-style `{"detail": ...}` for
/// raised HTTP errors, `{"status": "error", "message": ...}` elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best-effort human-readable text, preferring the FastAPI detail.
    pub fn text(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.message.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("gesture name must not be empty")]
    EmptyGestureName,
}

/// Trimmed gesture name, rejecting empty/whitespace-only input before any
/// request is issued.
pub fn validate_gesture_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyGestureName);
    }
    Ok(trimmed)
}
