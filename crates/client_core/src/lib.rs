use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::ControlMode,
    error::{validate_gesture_name, ErrorBody, ValidationError},
    protocol::{
        AckResponse, DeleteGestureRequest, GestureMap, SaveGestureRequest, SetModeRequest,
        StartRecordingRequest, StatusSnapshot,
    },
};
use thiserror::Error;
use tracing::debug;

pub mod poller;

pub use poller::{PollOutcome, PollUpdate, StatusPoller, DEFAULT_POLL_PERIOD};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Api {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
    #[error("invalid payload from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("retraining failed: {0}")]
    Retrain(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Transport-level failures are what the dashboard folds into its
    /// "backend offline" indicator; everything else is a reachable backend
    /// saying no.
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// HTTP client over the gesture backend's JSON surface. One instance is
/// shared by the poller and every action dispatcher; reqwest pools the
/// underlying connections.
pub struct DashboardClient {
    http: Client,
    server_url: String,
}

impl DashboardClient {
    pub fn new(server_url: impl Into<String>) -> Result<Self, ClientError> {
        let server_url = server_url.into();
        let server_url = server_url.trim().trim_end_matches('/').to_string();
        if let Err(source) = url::Url::parse(&server_url) {
            return Err(ClientError::InvalidServerUrl {
                url: server_url,
                source,
            });
        }
        Ok(Self {
            http: Client::new(),
            server_url,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Current gesture mapping; rebuilt wholesale by the caller on every
    /// fetch.
    pub async fn fetch_gestures(&self) -> Result<GestureMap, ClientError> {
        self.get_json("/gestures").await
    }

    /// One status snapshot; the poller wraps this with sequencing.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, ClientError> {
        self.get_json("/status").await
    }

    /// Ask the backend to start a recording session for `name`. The name is
    /// validated locally so an empty name never reaches the wire.
    pub async fn start_recording(&self, name: &str) -> Result<(), ClientError> {
        let name = validate_gesture_name(name)?.to_string();
        self.post_json("/start_recording", &StartRecordingRequest { name })
            .await?;
        Ok(())
    }

    pub async fn save_gesture(&self, name: &str, action: &str) -> Result<(), ClientError> {
        let name = validate_gesture_name(name)?.to_string();
        self.post_json(
            "/save_gesture",
            &SaveGestureRequest {
                name,
                action: action.trim().to_string(),
            },
        )
        .await?;
        Ok(())
    }

    pub async fn delete_gesture(&self, name: &str) -> Result<(), ClientError> {
        let name = validate_gesture_name(name)?.to_string();
        self.post_json("/delete_gesture", &DeleteGestureRequest { name })
            .await?;
        Ok(())
    }

    /// Trigger a model retrain. The backend reports some failures inside a
    /// 2xx body (`{"status": "error", ...}`), so the acknowledgement is
    /// inspected as well.
    pub async fn retrain(&self) -> Result<(), ClientError> {
        let ack = self.post_empty("/retrain").await?;
        if ack.is_soft_error() {
            return Err(ClientError::Retrain(
                ack.message
                    .unwrap_or_else(|| "backend reported an unspecified training error".to_string()),
            ));
        }
        Ok(())
    }

    pub async fn start_system(&self) -> Result<(), ClientError> {
        self.post_empty("/system/start").await?;
        Ok(())
    }

    pub async fn stop_system(&self) -> Result<(), ClientError> {
        self.post_empty("/system/stop").await?;
        Ok(())
    }

    pub async fn set_mode(&self, mode: ControlMode) -> Result<(), ClientError> {
        self.post_json("/system/mode", &SetModeRequest { mode })
            .await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(format!("{}{endpoint}", self.server_url))
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        Self::decode(endpoint, response).await
    }

    async fn post_json<B: Serialize>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<AckResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}{endpoint}", self.server_url))
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        Self::decode(endpoint, response).await
    }

    async fn post_empty(&self, endpoint: &'static str) -> Result<AckResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}{endpoint}", self.server_url))
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        Self::decode(endpoint, response).await
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.text().map(str::to_string))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unrecognized status")
                        .to_string()
                });
            debug!(endpoint, status = status.as_u16(), "backend rejected request");
            return Err(ClientError::Api {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode { endpoint, source })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
