use serde::{Deserialize, Serialize};

/// Whether recognized gestures actively trigger system actions or are
/// merely observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Control,
    Passive,
}

impl ControlMode {
    pub fn from_active(active: bool) -> Self {
        if active {
            Self::Control
        } else {
            Self::Passive
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Control)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Control => Self::Passive,
            Self::Passive => Self::Control,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Passive => "passive",
        }
    }
}
