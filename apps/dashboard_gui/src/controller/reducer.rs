//! Pure dashboard state and its transitions.
//!
//! The egui pass only reads this state and queues commands; every transition
//! lives here so reconciliation behavior is testable without a UI.

use std::time::{Duration, Instant};

use client_core::{PollOutcome, PollUpdate};
use shared::{
    domain::ControlMode,
    protocol::{ActionLogEntry, GestureMap, StatusSnapshot},
};

pub const GESTURE_LIST_PLACEHOLDER: &str = "No gestures found. Add one!";
pub const GESTURE_LIST_OFFLINE: &str = "Failed to load gestures. Backend offline?";
pub const ACTIVITY_LOG_PLACEHOLDER: &str = "No recent activity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendLink {
    /// No poll has settled yet.
    Unknown,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelIndicator {
    /// Camera off; nothing to classify.
    Offline,
    /// Camera running but no trained model on disk.
    Missing,
    /// Model loaded, no gesture above the confidence floor right now.
    Listening,
    Active {
        pct: u8,
    },
}

impl ModelIndicator {
    fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        if !snapshot.camera_on {
            Self::Offline
        } else if !snapshot.model_loaded {
            Self::Missing
        } else if snapshot.confidence > 0.0 {
            Self::Active {
                pct: snapshot.confidence_pct(),
            }
        } else {
            Self::Listening
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Offline => "Offline".to_string(),
            Self::Missing => "Model Missing".to_string(),
            Self::Listening => "Listening...".to_string(),
            Self::Active { pct } => format!("Active ({pct}%)"),
        }
    }
}

/// Confidence bar color band: >80 success, 50 < pct <= 80 warning, else
/// danger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    Success,
    Warning,
    Danger,
}

impl ConfidenceBand {
    pub fn from_pct(pct: u8) -> Self {
        if pct > 80 {
            Self::Success
        } else if pct > 50 {
            Self::Warning
        } else {
            Self::Danger
        }
    }
}

pub struct DashboardState {
    pub link: BackendLink,
    pub camera_on: bool,
    pub recording: bool,
    pub control_active: bool,
    /// Optimistic mode flip awaiting its request; reconciliation must not
    /// overwrite the checkbox while set.
    pub mode_request_in_flight: bool,
    pub record_request_in_flight: bool,
    pub model: ModelIndicator,
    pub last_action: Option<String>,
    /// Most-recent-first copy of the backend's append-only log.
    pub activity: Vec<ActionLogEntry>,
    pub gestures: GestureMap,
    pub gestures_error: Option<String>,
    pub pending_delete: Option<String>,
    pub toasts: Vec<Toast>,
    pub status_line: String,
    toast_ttl: Duration,
    last_poll_seq: u64,
}

impl DashboardState {
    pub fn new(toast_ttl: Duration) -> Self {
        Self {
            link: BackendLink::Unknown,
            camera_on: false,
            recording: false,
            control_active: false,
            mode_request_in_flight: false,
            record_request_in_flight: false,
            model: ModelIndicator::Offline,
            last_action: None,
            activity: Vec::new(),
            gestures: GestureMap::new(),
            gestures_error: None,
            pending_delete: None,
            toasts: Vec::new(),
            status_line: "Connecting to backend...".to_string(),
            toast_ttl,
            last_poll_seq: 0,
        }
    }

    // ---- status reconciliation ----

    /// Applies one poll result. Returns false when the update is stale
    /// (sequence not newer than the last applied one) and was discarded.
    pub fn apply_poll(&mut self, update: PollUpdate) -> bool {
        if update.seq <= self.last_poll_seq {
            return false;
        }
        self.last_poll_seq = update.seq;
        match update.outcome {
            PollOutcome::Snapshot(snapshot) => self.apply_snapshot(&snapshot),
            PollOutcome::Offline(_) => self.mark_offline(),
        }
        true
    }

    fn apply_snapshot(&mut self, snapshot: &StatusSnapshot) {
        self.link = BackendLink::Online;
        self.camera_on = snapshot.camera_on;
        self.recording = snapshot.recording;
        if !self.mode_request_in_flight {
            self.control_active = snapshot.control_active;
        }
        self.model = ModelIndicator::from_snapshot(snapshot);
        self.last_action = snapshot.last_action().map(|entry| entry.name.clone());
        self.activity = snapshot.action_log.iter().rev().cloned().collect();
    }

    /// Offline tick: flag the link; dependent regions keep their last
    /// reconciled values.
    fn mark_offline(&mut self) {
        self.link = BackendLink::Offline;
    }

    pub fn system_indicator(&self) -> &'static str {
        match self.link {
            BackendLink::Unknown => "Connecting...",
            BackendLink::Offline => "Backend Offline",
            BackendLink::Online if self.camera_on => "Camera Active",
            BackendLink::Online => "Camera Idle",
        }
    }

    pub fn power_button_label(&self) -> &'static str {
        if self.camera_on {
            "Stop System"
        } else {
            "Start System"
        }
    }

    // ---- control mode ----

    /// Optimistic flip: the checkbox changes immediately and the reconciler
    /// is suppressed until [`Self::settle_mode`].
    pub fn begin_mode_request(&mut self, mode: ControlMode) {
        self.control_active = mode.is_active();
        self.mode_request_in_flight = true;
    }

    pub fn settle_mode(&mut self, mode: ControlMode, accepted: bool) {
        self.mode_request_in_flight = false;
        self.control_active = if accepted {
            mode.is_active()
        } else {
            // Rejected: undo the optimistic flip.
            !mode.is_active()
        };
    }

    // ---- recording ----

    pub fn begin_record_request(&mut self) {
        self.record_request_in_flight = true;
    }

    pub fn settle_record_request(&mut self) {
        self.record_request_in_flight = false;
    }

    // ---- gesture list ----

    pub fn set_gestures(&mut self, gestures: GestureMap) {
        self.gestures = gestures;
        self.gestures_error = None;
    }

    pub fn set_gestures_error(&mut self, reason: String) {
        self.gestures_error = Some(reason);
    }

    pub fn gesture_count(&self) -> usize {
        self.gestures.len()
    }

    /// Message shown instead of list rows, if any.
    pub fn gesture_list_notice(&self) -> Option<&str> {
        if self.gestures_error.is_some() {
            Some(GESTURE_LIST_OFFLINE)
        } else if self.gestures.is_empty() {
            Some(GESTURE_LIST_PLACEHOLDER)
        } else {
            None
        }
    }

    // ---- delete confirmation ----

    pub fn request_delete(&mut self, name: String) {
        self.pending_delete = Some(name);
    }

    /// Decline: clears the prompt; no request may be issued.
    pub fn decline_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirm: hands back the name to dispatch and clears the prompt.
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    // ---- toasts ----

    pub fn push_toast(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        self.toasts.push(Toast {
            kind,
            message: message.into(),
            expires_at: now + self.toast_ttl,
        });
    }

    pub fn prune_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    pub fn dismiss_toast(&mut self, index: usize) {
        if index < self.toasts.len() {
            self.toasts.remove(index);
        }
    }
}
