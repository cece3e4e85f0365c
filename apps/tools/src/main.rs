use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{DashboardClient, DEFAULT_SERVER_URL};
use shared::domain::ControlMode;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current status snapshot.
    Status,
    /// List gesture mappings.
    Gestures,
    /// Ask the backend to record samples for a gesture.
    Record { name: String },
    /// Save or update a gesture mapping.
    Save { name: String, action: String },
    /// Delete a gesture mapping.
    Delete { name: String },
    /// Retrain the recognition model from saved samples.
    Retrain,
    /// Start or stop the camera system.
    System { op: String },
    /// Switch between control and passive mode.
    Mode { mode: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();
    let client = DashboardClient::new(&cli.server_url)?;

    match cli.command {
        Command::Status => {
            let status = client.fetch_status().await?;
            println!("camera_on={}", status.camera_on);
            println!("model_loaded={}", status.model_loaded);
            println!("confidence={}%", status.confidence_pct());
            println!("recording={}", status.recording);
            println!("control_active={}", status.control_active);
            if !status.action_log.is_empty() {
                println!("recent actions (most recent first):");
                for entry in status.action_log.iter().rev() {
                    println!("  {}  {}", entry.time, entry.name);
                }
            }
        }
        Command::Gestures => {
            let gestures = client.fetch_gestures().await?;
            if gestures.is_empty() {
                println!("no gestures saved");
            }
            for (name, action) in gestures {
                println!("{name} -> {action}");
            }
        }
        Command::Record { name } => {
            client.start_recording(&name).await?;
            println!("recording started for '{name}'");
        }
        Command::Save { name, action } => {
            client.save_gesture(&name, &action).await?;
            println!("saved gesture '{name}'");
        }
        Command::Delete { name } => {
            client.delete_gesture(&name).await?;
            println!("deleted gesture '{name}'");
        }
        Command::Retrain => {
            client.retrain().await?;
            println!("training complete");
        }
        Command::System { op } => {
            if op.eq_ignore_ascii_case("start") {
                client.start_system().await?;
            } else {
                client.stop_system().await?;
            }
            println!("system {op} command sent");
        }
        Command::Mode { mode } => {
            let mode = if mode.eq_ignore_ascii_case("control") {
                ControlMode::Control
            } else {
                ControlMode::Passive
            };
            client.set_mode(mode).await?;
            println!("mode set to {}", mode.label());
        }
    }

    Ok(())
}
