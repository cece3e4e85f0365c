//! Backend commands queued from UI to backend worker.

use shared::domain::ControlMode;

pub enum BackendCommand {
    FetchGestures,
    StartRecording { name: String },
    SaveGesture { name: String, action: String },
    DeleteGesture { name: String },
    Retrain,
    StartSystem,
    StopSystem,
    SetMode { mode: ControlMode },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchGestures => "fetch_gestures",
            BackendCommand::StartRecording { .. } => "start_recording",
            BackendCommand::SaveGesture { .. } => "save_gesture",
            BackendCommand::DeleteGesture { .. } => "delete_gesture",
            BackendCommand::Retrain => "retrain",
            BackendCommand::StartSystem => "start_system",
            BackendCommand::StopSystem => "stop_system",
            BackendCommand::SetMode { .. } => "set_mode",
        }
    }
}
