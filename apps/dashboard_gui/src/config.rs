use std::{collections::HashMap, fs, time::Duration};

use client_core::DEFAULT_SERVER_URL;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub toast_ttl_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval_ms: 1000,
            toast_ttl_ms: 3000,
        }
    }
}

impl Settings {
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }
}

/// Defaults, overlaid by `dashboard.toml` in the working directory, overlaid
/// by environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("dashboard.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("server_url") {
        settings.server_url = v.clone();
    }
    if let Some(v) = file_cfg.get("poll_interval_ms") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.poll_interval_ms = parsed;
        }
    }
    if let Some(v) = file_cfg.get("toast_ttl_ms") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.toast_ttl_ms = parsed;
        }
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DASHBOARD_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__POLL_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.poll_interval_ms = parsed;
        }
    }
    if let Some(v) = lookup("APP__TOAST_TTL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.toast_ttl_ms = parsed;
        }
    }
}
