use std::time::{Duration, Instant};

mod backend_bridge;
mod config;
mod controller;

use backend_bridge::{commands::BackendCommand, runtime};
use controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::{
        BackendLink, ConfidenceBand, DashboardState, ModelIndicator, ToastKind,
        ACTIVITY_LOG_PLACEHOLDER,
    },
};
use crossbeam_channel::{bounded, Receiver, Sender};
use eframe::egui;
use shared::domain::ControlMode;

const COLOR_GREEN: egui::Color32 = egui::Color32::from_rgb(57, 255, 20);
const COLOR_CYAN: egui::Color32 = egui::Color32::from_rgb(0, 243, 255);
const COLOR_PINK: egui::Color32 = egui::Color32::from_rgb(255, 16, 240);
const COLOR_AMBER: egui::Color32 = egui::Color32::from_rgb(255, 193, 7);
const COLOR_RED: egui::Color32 = egui::Color32::from_rgb(220, 53, 69);
const COLOR_DIM: egui::Color32 = egui::Color32::GRAY;

const RECORD_PROGRESS_TEXT: &str = "Recording in progress... watch the camera feed.";

fn band_color(band: ConfidenceBand) -> egui::Color32 {
    match band {
        ConfidenceBand::Success => COLOR_GREEN,
        ConfidenceBand::Warning => COLOR_AMBER,
        ConfidenceBand::Danger => COLOR_RED,
    }
}

fn toast_color(kind: ToastKind) -> egui::Color32 {
    match kind {
        ToastKind::Info => COLOR_CYAN,
        ToastKind::Success => COLOR_GREEN,
        ToastKind::Error => COLOR_RED,
    }
}

fn model_color(model: ModelIndicator) -> egui::Color32 {
    match model {
        ModelIndicator::Offline => COLOR_DIM,
        ModelIndicator::Missing => COLOR_PINK,
        ModelIndicator::Listening => COLOR_CYAN,
        ModelIndicator::Active { .. } => COLOR_GREEN,
    }
}

fn link_color(link: BackendLink, camera_on: bool) -> egui::Color32 {
    match link {
        BackendLink::Online if camera_on => COLOR_GREEN,
        BackendLink::Online => COLOR_DIM,
        BackendLink::Offline => COLOR_RED,
        BackendLink::Unknown => COLOR_DIM,
    }
}

/// Roughly half-second blink at the ~100 ms repaint cadence.
fn blink_on(tick: u64) -> bool {
    (tick / 5) % 2 == 0
}

struct DashboardGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    state: DashboardState,

    add_gesture_open: bool,
    gesture_name_draft: String,
    gesture_action_draft: String,
    record_progress: Option<&'static str>,

    // Frame tick for the recording blink.
    tick: u64,
}

impl DashboardGuiApp {
    fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, settings: &config::Settings) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: DashboardState::new(settings.toast_ttl()),
            add_gesture_open: false,
            gesture_name_draft: String::new(),
            gesture_action_draft: String::new(),
            record_progress: None,
            tick: 0,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let now = Instant::now();
            match event {
                UiEvent::Poll(update) => {
                    self.state.apply_poll(update);
                }
                UiEvent::GesturesLoaded(gestures) => self.state.set_gestures(gestures),
                UiEvent::GesturesFailed(reason) => self.state.set_gestures_error(reason),
                UiEvent::RecordingStarted { name } => {
                    self.state.settle_record_request();
                    self.record_progress = Some(RECORD_PROGRESS_TEXT);
                    self.state.push_toast(
                        ToastKind::Success,
                        format!("Recording started for '{name}'"),
                        now,
                    );
                }
                UiEvent::RecordingFailed { name, reason } => {
                    self.state.settle_record_request();
                    self.record_progress = None;
                    self.state.status_line = format!("Recording '{name}' not started");
                    self.state.push_toast(ToastKind::Error, reason, now);
                }
                UiEvent::GestureSaved { name } => {
                    self.add_gesture_open = false;
                    self.gesture_name_draft.clear();
                    self.record_progress = None;
                    self.state.status_line = format!("Saved gesture '{name}'");
                    self.state
                        .push_toast(ToastKind::Success, "Gesture saved successfully!", now);
                }
                UiEvent::GestureSaveFailed { name, reason } => {
                    self.state.status_line = format!("Saving gesture '{name}' failed");
                    self.state.push_toast(ToastKind::Error, reason, now);
                }
                UiEvent::GestureDeleted { name } => {
                    self.state.status_line = format!("Deleted gesture '{name}'");
                    self.state.push_toast(ToastKind::Success, "Gesture deleted.", now);
                }
                UiEvent::GestureDeleteFailed { name, reason } => {
                    self.state.status_line = format!("Deleting gesture '{name}' failed");
                    self.state.push_toast(ToastKind::Error, reason, now);
                }
                UiEvent::RetrainFinished => {
                    self.state
                        .push_toast(ToastKind::Success, "Training complete!", now);
                }
                UiEvent::RetrainFailed(reason) => {
                    self.state.push_toast(ToastKind::Error, reason, now);
                }
                UiEvent::ModeSettled {
                    mode,
                    accepted,
                    reason,
                } => {
                    self.state.settle_mode(mode, accepted);
                    if !accepted {
                        self.state.push_toast(
                            ToastKind::Error,
                            reason.unwrap_or_else(|| "Failed to set mode".to_string()),
                            now,
                        );
                    }
                }
                UiEvent::SystemToggleFailed(reason) => {
                    self.state.push_toast(
                        ToastKind::Error,
                        format!("Failed to toggle system: {reason}"),
                        now,
                    );
                }
                UiEvent::BackendStartupFailed(reason) => {
                    self.state.status_line = reason.clone();
                    self.state.push_toast(ToastKind::Error, reason, now);
                }
            }
        }
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Gesture Control");
                ui.separator();
                ui.colored_label(
                    link_color(self.state.link, self.state.camera_on),
                    format!("● {}", self.state.system_indicator()),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let power_enabled = self.state.link == BackendLink::Online;
                    let power = ui.add_enabled(
                        power_enabled,
                        egui::Button::new(self.state.power_button_label()),
                    );
                    if power.clicked() {
                        let cmd = if self.state.camera_on {
                            BackendCommand::StopSystem
                        } else {
                            BackendCommand::StartSystem
                        };
                        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status_line);
                    }
                    if ui.button("Retrain Model").clicked() {
                        self.state
                            .push_toast(ToastKind::Info, "Starting training...", Instant::now());
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::Retrain,
                            &mut self.state.status_line,
                        );
                    }
                });
            });
        });
    }

    fn render_gesture_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("gesture_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(format!("Gestures ({})", self.state.gesture_count()));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Add Gesture").clicked() {
                            self.add_gesture_open = true;
                            self.record_progress = None;
                        }
                    });
                });
                ui.separator();

                if let Some(notice) = self.state.gesture_list_notice() {
                    ui.weak(notice);
                    return;
                }

                let mut delete_request = None;
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (name, action) in &self.state.gestures {
                        ui.horizontal(|ui| {
                            ui.strong(name.as_str());
                            ui.weak(action.as_str());
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.small_button("✕").on_hover_text("Delete").clicked() {
                                        delete_request = Some(name.clone());
                                    }
                                },
                            );
                        });
                    }
                });
                if let Some(name) = delete_request {
                    self.state.request_delete(name);
                }
            });
    }

    fn render_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Model:");
                ui.colored_label(model_color(self.state.model), self.state.model.label());
            });
            if let ModelIndicator::Active { pct } = self.state.model {
                let bar = egui::ProgressBar::new(f32::from(pct) / 100.0)
                    .fill(band_color(ConfidenceBand::from_pct(pct)))
                    .show_percentage();
                ui.add(bar);
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Recording:");
                if self.state.recording {
                    let color = if blink_on(self.tick) {
                        COLOR_PINK
                    } else {
                        COLOR_DIM
                    };
                    ui.colored_label(color, "Recording...");
                } else {
                    ui.label("Idle");
                }
            });

            if self.state.link == BackendLink::Online && self.state.camera_on {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let mut control_active = self.state.control_active;
                    let checkbox = ui.add_enabled(
                        !self.state.mode_request_in_flight,
                        egui::Checkbox::new(&mut control_active, "Control mode"),
                    );
                    if checkbox.changed() {
                        let mode = ControlMode::from_active(control_active);
                        self.state.begin_mode_request(mode);
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::SetMode { mode },
                            &mut self.state.status_line,
                        );
                    }
                    if self.state.control_active {
                        ui.colored_label(COLOR_CYAN, "Enabled");
                    } else {
                        ui.colored_label(COLOR_DIM, "Disabled");
                    }
                });
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Last Action:");
                match &self.state.last_action {
                    Some(name) => ui.strong(name.as_str()),
                    None => ui.label("None"),
                };
            });

            ui.separator();
            ui.heading("Activity Log");
            egui::ScrollArea::vertical().show(ui, |ui| {
                if self.state.activity.is_empty() {
                    ui.weak(ACTIVITY_LOG_PLACEHOLDER);
                    return;
                }
                for entry in &self.state.activity {
                    ui.horizontal(|ui| {
                        ui.label(format!("Detected: {}", entry.name));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.weak(entry.time.as_str());
                        });
                    });
                }
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let mut dismissed = None;
            for (index, toast) in self.state.toasts.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.colored_label(toast_color(toast.kind), toast.message.as_str());
                    if ui.small_button("Dismiss").clicked() {
                        dismissed = Some(index);
                    }
                });
            }
            if let Some(index) = dismissed {
                self.state.dismiss_toast(index);
            }
            ui.small(self.state.status_line.as_str());
        });
    }

    fn render_add_gesture_dialog(&mut self, ctx: &egui::Context) {
        if !self.add_gesture_open {
            return;
        }
        let mut open = self.add_gesture_open;
        egui::Window::new("Add Gesture")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Gesture name");
                ui.text_edit_singleline(&mut self.gesture_name_draft);
                ui.label("Action");
                ui.text_edit_singleline(&mut self.gesture_action_draft);

                if let Some(progress) = self.record_progress {
                    ui.colored_label(COLOR_AMBER, progress);
                }

                ui.horizontal(|ui| {
                    let record_label = if self.state.record_request_in_flight {
                        "Requesting..."
                    } else {
                        "Start Recording"
                    };
                    let record = ui.add_enabled(
                        !self.state.record_request_in_flight,
                        egui::Button::new(record_label),
                    );
                    if record.clicked() {
                        self.start_recording_clicked();
                    }
                    if ui.button("Save Gesture").clicked() {
                        self.save_gesture_clicked();
                    }
                });
            });
        self.add_gesture_open = open;
    }

    fn render_delete_dialog(&mut self, ctx: &egui::Context) {
        let Some(name) = self.state.pending_delete.clone() else {
            return;
        };
        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Delete gesture '{name}'?"));
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        if let Some(name) = self.state.confirm_delete() {
                            dispatch_backend_command(
                                &self.cmd_tx,
                                BackendCommand::DeleteGesture { name },
                                &mut self.state.status_line,
                            );
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        self.state.decline_delete();
                    }
                });
            });
    }

    fn start_recording_clicked(&mut self) {
        let name = self.gesture_name_draft.trim().to_string();
        if name.is_empty() {
            self.state
                .push_toast(ToastKind::Error, "Please enter a gesture name!", Instant::now());
            return;
        }
        self.state.begin_record_request();
        self.record_progress = None;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::StartRecording { name },
            &mut self.state.status_line,
        );
    }

    fn save_gesture_clicked(&mut self) {
        let name = self.gesture_name_draft.trim().to_string();
        if name.is_empty() {
            self.state
                .push_toast(ToastKind::Error, "Please enter a gesture name.", Instant::now());
            return;
        }
        let action = self.gesture_action_draft.trim().to_string();
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SaveGesture { name, action },
            &mut self.state.status_line,
        );
    }
}

impl eframe::App for DashboardGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick = self.tick.wrapping_add(1);

        self.process_ui_events();
        self.state.prune_toasts(Instant::now());

        self.render_header(ctx);
        self.render_gesture_panel(ctx);
        self.render_status_bar(ctx);
        self.render_central(ctx);
        self.render_add_gesture_dialog(ctx);
        self.render_delete_dialog(ctx);

        // Poll updates and the recording blink arrive between input events.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = config::load_settings();
    tracing::info!(server_url = %settings.server_url, "starting dashboard");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    runtime::spawn_backend_thread(settings.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Gesture Control Dashboard")
            .with_inner_size([1080.0, 720.0])
            .with_min_inner_size([860.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Gesture Control Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardGuiApp::new(cmd_tx, ui_rx, &settings)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_bands_map_to_distinct_colors() {
        assert_eq!(band_color(ConfidenceBand::Success), COLOR_GREEN);
        assert_eq!(band_color(ConfidenceBand::Warning), COLOR_AMBER);
        assert_eq!(band_color(ConfidenceBand::Danger), COLOR_RED);
    }

    #[test]
    fn missing_model_is_highlighted() {
        assert_eq!(model_color(ModelIndicator::Missing), COLOR_PINK);
        assert_eq!(model_color(ModelIndicator::Active { pct: 90 }), COLOR_GREEN);
    }

    #[test]
    fn blink_toggles_over_ticks() {
        assert!(blink_on(0));
        assert!(!blink_on(5));
        assert!(blink_on(10));
    }

    #[test]
    fn offline_link_is_flagged_red_regardless_of_camera() {
        assert_eq!(link_color(BackendLink::Offline, true), COLOR_RED);
        assert_eq!(link_color(BackendLink::Offline, false), COLOR_RED);
        assert_eq!(link_color(BackendLink::Online, true), COLOR_GREEN);
    }
}
