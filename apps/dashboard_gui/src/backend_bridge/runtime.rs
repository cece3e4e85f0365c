//! Backend worker: owns the tokio runtime, the HTTP client, and the status
//! poller; drains the UI command queue and reports every outcome back as a
//! [`UiEvent`]. Nothing in here panics on backend failure.

use std::{sync::Arc, thread};

use client_core::{ClientError, DashboardClient, StatusPoller};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::{
    backend_bridge::commands::BackendCommand, config::Settings, controller::events::UiEvent,
};

/// Transport failures all read the same to the user; API rejections keep
/// their backend-provided text.
fn failure_text(err: &ClientError) -> String {
    if err.is_offline() {
        "Backend connection failed.".to_string()
    } else {
        err.to_string()
    }
}

pub fn spawn_backend_thread(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendStartupFailed(format!(
                    "failed to build backend runtime: {err}"
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match DashboardClient::new(&settings.server_url) {
                Ok(client) => Arc::new(client),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::BackendStartupFailed(err.to_string()));
                    error!("backend worker startup failure: {err}");
                    return;
                }
            };
            info!(server_url = client.server_url(), "backend worker ready");

            let poller = StatusPoller::new(Arc::clone(&client), settings.poll_period());
            let mut updates = poller.subscribe();
            let poll_task = poller.spawn();

            let ui_tx_poll = ui_tx.clone();
            let forward_task = tokio::spawn(async move {
                loop {
                    match updates.recv().await {
                        Ok(update) => {
                            let _ = ui_tx_poll.try_send(UiEvent::Poll(update));
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!(skipped, "status update forwarding lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            });

            // First paint: load the gesture list without waiting for a click.
            refresh_gestures(&client, &ui_tx).await;

            while let Ok(cmd) = cmd_rx.recv() {
                debug!(command = cmd.name(), "processing backend command");
                match cmd {
                    BackendCommand::FetchGestures => {
                        refresh_gestures(&client, &ui_tx).await;
                    }
                    BackendCommand::StartRecording { name } => {
                        match client.start_recording(&name).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::RecordingStarted { name });
                            }
                            Err(err) => {
                                warn!("start_recording failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::RecordingFailed {
                                    name,
                                    reason: failure_text(&err),
                                });
                            }
                        }
                    }
                    BackendCommand::SaveGesture { name, action } => {
                        match client.save_gesture(&name, &action).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::GestureSaved { name });
                                refresh_gestures(&client, &ui_tx).await;
                            }
                            Err(err) => {
                                warn!("save_gesture failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::GestureSaveFailed {
                                    name,
                                    reason: failure_text(&err),
                                });
                            }
                        }
                    }
                    BackendCommand::DeleteGesture { name } => {
                        match client.delete_gesture(&name).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::GestureDeleted { name });
                                refresh_gestures(&client, &ui_tx).await;
                            }
                            Err(err) => {
                                warn!("delete_gesture failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::GestureDeleteFailed {
                                    name,
                                    reason: failure_text(&err),
                                });
                            }
                        }
                    }
                    BackendCommand::Retrain => match client.retrain().await {
                        Ok(()) => {
                            let _ = ui_tx.try_send(UiEvent::RetrainFinished);
                        }
                        Err(err) => {
                            warn!("retrain failed: {err}");
                            let _ = ui_tx.try_send(UiEvent::RetrainFailed(failure_text(&err)));
                        }
                    },
                    BackendCommand::StartSystem => {
                        // Success shows up through the next poll tick.
                        if let Err(err) = client.start_system().await {
                            warn!("system start failed: {err}");
                            let _ =
                                ui_tx.try_send(UiEvent::SystemToggleFailed(failure_text(&err)));
                        }
                    }
                    BackendCommand::StopSystem => {
                        if let Err(err) = client.stop_system().await {
                            warn!("system stop failed: {err}");
                            let _ =
                                ui_tx.try_send(UiEvent::SystemToggleFailed(failure_text(&err)));
                        }
                    }
                    BackendCommand::SetMode { mode } => match client.set_mode(mode).await {
                        Ok(()) => {
                            let _ = ui_tx.try_send(UiEvent::ModeSettled {
                                mode,
                                accepted: true,
                                reason: None,
                            });
                        }
                        Err(err) => {
                            warn!("set_mode failed: {err}");
                            let _ = ui_tx.try_send(UiEvent::ModeSettled {
                                mode,
                                accepted: false,
                                reason: Some(failure_text(&err)),
                            });
                        }
                    },
                }
            }

            poll_task.abort();
            forward_task.abort();
        });
    });
}

async fn refresh_gestures(client: &DashboardClient, ui_tx: &Sender<UiEvent>) {
    match client.fetch_gestures().await {
        Ok(gestures) => {
            let _ = ui_tx.try_send(UiEvent::GesturesLoaded(gestures));
        }
        Err(err) => {
            debug!("gesture fetch failed: {err}");
            let _ = ui_tx.try_send(UiEvent::GesturesFailed(failure_text(&err)));
        }
    }
}
