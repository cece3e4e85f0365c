use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};

#[derive(Clone, Default)]
struct Recorded {
    posts: Arc<Mutex<Vec<(&'static str, serde_json::Value)>>>,
}

impl Recorded {
    async fn record(&self, endpoint: &'static str, body: serde_json::Value) {
        self.posts.lock().await.push((endpoint, body));
    }

    async fn taken(&self) -> Vec<(&'static str, serde_json::Value)> {
        self.posts.lock().await.clone()
    }
}

async fn spawn_backend(router: Router) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test backend");
    });
    (format!("http://{addr}"), task)
}

fn recording_router(recorded: Recorded) -> Router {
    Router::new()
        .route(
            "/start_recording",
            post(
                |State(recorded): State<Recorded>, Json(body): Json<serde_json::Value>| async move {
                    recorded.record("/start_recording", body).await;
                    Json(serde_json::json!({"status": "recording command sent"}))
                },
            ),
        )
        .route(
            "/save_gesture",
            post(
                |State(recorded): State<Recorded>, Json(body): Json<serde_json::Value>| async move {
                    recorded.record("/save_gesture", body).await;
                    Json(serde_json::json!({"message": "Gesture saved"}))
                },
            ),
        )
        .route(
            "/system/mode",
            post(
                |State(recorded): State<Recorded>, Json(body): Json<serde_json::Value>| async move {
                    recorded.record("/system/mode", body).await;
                    Json(serde_json::json!({"status": "mode set"}))
                },
            ),
        )
        .with_state(recorded)
}

#[tokio::test]
async fn fetch_gestures_decodes_mapping() {
    let router = Router::new().route(
        "/gestures",
        get(|| async { Json(serde_json::json!({"wave": "volume_up", "fist": "pause"})) }),
    );
    let (server_url, server) = spawn_backend(router).await;

    let client = DashboardClient::new(&server_url).expect("client");
    let gestures = client.fetch_gestures().await.expect("gestures");

    assert_eq!(gestures.len(), 2);
    assert_eq!(gestures.get("wave").map(String::as_str), Some("volume_up"));
    server.abort();
}

#[tokio::test]
async fn save_gesture_posts_trimmed_payload() {
    let recorded = Recorded::default();
    let (server_url, server) = spawn_backend(recording_router(recorded.clone())).await;

    let client = DashboardClient::new(&server_url).expect("client");
    client
        .save_gesture("  wave  ", " volume_up ")
        .await
        .expect("save");

    let posts = recorded.taken().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "/save_gesture");
    assert_eq!(
        posts[0].1,
        serde_json::json!({"name": "wave", "action": "volume_up"})
    );
    server.abort();
}

#[tokio::test]
async fn empty_gesture_name_is_rejected_before_any_request() {
    let recorded = Recorded::default();
    let (server_url, server) = spawn_backend(recording_router(recorded.clone())).await;

    let client = DashboardClient::new(&server_url).expect("client");
    let err = client.start_recording("   ").await.expect_err("must reject");

    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::EmptyGestureName)
    ));
    assert!(recorded.taken().await.is_empty());
    server.abort();
}

#[tokio::test]
async fn set_mode_posts_wire_mode() {
    let recorded = Recorded::default();
    let (server_url, server) = spawn_backend(recording_router(recorded.clone())).await;

    let client = DashboardClient::new(&server_url).expect("client");
    client.set_mode(ControlMode::Control).await.expect("set mode");
    client.set_mode(ControlMode::Passive).await.expect("set mode");

    let posts = recorded.taken().await;
    let modes: Vec<_> = posts
        .iter()
        .filter(|(endpoint, _)| *endpoint == "/system/mode")
        .map(|(_, body)| body.clone())
        .collect();
    assert_eq!(
        modes,
        vec![
            serde_json::json!({"mode": "control"}),
            serde_json::json!({"mode": "passive"}),
        ]
    );
    server.abort();
}

#[tokio::test]
async fn api_errors_surface_backend_detail() {
    let router = Router::new().route(
        "/delete_gesture",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"detail": "gesture store locked"})),
            )
        }),
    );
    let (server_url, server) = spawn_backend(router).await;

    let client = DashboardClient::new(&server_url).expect("client");
    let err = client.delete_gesture("wave").await.expect_err("must fail");

    match err {
        ClientError::Api {
            endpoint,
            status,
            message,
        } => {
            assert_eq!(endpoint, "/delete_gesture");
            assert_eq!(status, 500);
            assert_eq!(message, "gesture store locked");
        }
        other => panic!("expected api error, got {other:?}"),
    }
    server.abort();
}

#[tokio::test]
async fn transport_failures_classify_as_offline() {
    // Bind to learn a free port, then drop the listener so nothing answers.
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("listener addr");
    drop(listener);

    let client = DashboardClient::new(format!("http://{addr}")).expect("client");
    let err = client.fetch_status().await.expect_err("must fail");

    assert!(err.is_offline());
}

#[tokio::test]
async fn retrain_treats_soft_error_body_as_failure() {
    let router = Router::new().route(
        "/retrain",
        post(|| async { Json(serde_json::json!({"status": "error", "message": "no samples"})) }),
    );
    let (server_url, server) = spawn_backend(router).await;

    let client = DashboardClient::new(&server_url).expect("client");
    let err = client.retrain().await.expect_err("must fail");

    assert!(matches!(&err, ClientError::Retrain(message) if message == "no samples"));
    assert!(!err.is_offline());
    server.abort();
}

#[tokio::test]
async fn reduced_status_body_decodes_with_defaults() {
    let router = Router::new().route(
        "/status",
        get(|| async { Json(serde_json::json!({"recording": true, "model_loaded": false})) }),
    );
    let (server_url, server) = spawn_backend(router).await;

    let client = DashboardClient::new(&server_url).expect("client");
    let snapshot = client.fetch_status().await.expect("status");

    assert!(snapshot.recording);
    assert!(!snapshot.camera_on);
    assert!(!snapshot.control_active);
    assert!(snapshot.action_log.is_empty());
    server.abort();
}

#[test]
fn server_url_is_normalized() {
    let client = DashboardClient::new(" http://127.0.0.1:8000/ ").expect("client");
    assert_eq!(client.server_url(), "http://127.0.0.1:8000");

    assert!(matches!(
        DashboardClient::new("not a url"),
        Err(ClientError::InvalidServerUrl { .. })
    ));
}
