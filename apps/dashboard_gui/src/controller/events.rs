//! Backend worker outcomes delivered to the UI thread.

use client_core::PollUpdate;
use shared::{domain::ControlMode, protocol::GestureMap};

pub enum UiEvent {
    /// One sequenced poll result; the reducer discards stale ones.
    Poll(PollUpdate),
    GesturesLoaded(GestureMap),
    GesturesFailed(String),
    RecordingStarted {
        name: String,
    },
    RecordingFailed {
        name: String,
        reason: String,
    },
    GestureSaved {
        name: String,
    },
    GestureSaveFailed {
        name: String,
        reason: String,
    },
    GestureDeleted {
        name: String,
    },
    GestureDeleteFailed {
        name: String,
        reason: String,
    },
    RetrainFinished,
    RetrainFailed(String),
    /// A mode request settled; `accepted == false` reverts the optimistic
    /// checkbox flip.
    ModeSettled {
        mode: ControlMode,
        accepted: bool,
        reason: Option<String>,
    },
    SystemToggleFailed(String),
    BackendStartupFailed(String),
}
