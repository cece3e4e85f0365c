use super::*;

use axum::{routing::get, Json, Router};
use tokio::net::TcpListener;

async fn spawn_status_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test backend");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn emits_snapshots_with_strictly_increasing_sequence() {
    let router = Router::new().route(
        "/status",
        get(|| async {
            Json(serde_json::json!({
                "camera_on": true,
                "model_loaded": true,
                "confidence": 0.42,
                "recording": false,
                "control_active": false,
                "action_log": []
            }))
        }),
    );
    let server_url = spawn_status_backend(router).await;

    let client = Arc::new(DashboardClient::new(&server_url).expect("client"));
    let poller = StatusPoller::new(client, Duration::from_millis(10));
    let mut updates = poller.subscribe();
    let task = poller.spawn();

    let mut last_seq = 0;
    for _ in 0..3 {
        let update = updates.recv().await.expect("poll update");
        assert!(update.seq > last_seq, "sequence must be strictly increasing");
        last_seq = update.seq;
        match update.outcome {
            PollOutcome::Snapshot(snapshot) => {
                assert!(snapshot.camera_on);
                assert_eq!(snapshot.confidence_pct(), 42);
            }
            PollOutcome::Offline(reason) => panic!("unexpected offline: {reason}"),
        }
    }
    task.abort();
}

#[tokio::test]
async fn unreachable_backend_reports_offline() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("listener addr");
    drop(listener);

    let client = Arc::new(DashboardClient::new(format!("http://{addr}")).expect("client"));
    let poller = StatusPoller::new(client, Duration::from_millis(10));
    let mut updates = poller.subscribe();
    let task = poller.spawn();

    let update = updates.recv().await.expect("poll update");
    assert!(update.seq >= 1);
    assert!(matches!(update.outcome, PollOutcome::Offline(_)));
    task.abort();
}

#[tokio::test]
async fn non_success_status_reports_offline_reason() {
    let router = Router::new().route(
        "/status",
        get(|| async {
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({"detail": "detector not running"})),
            )
        }),
    );
    let server_url = spawn_status_backend(router).await;

    let client = Arc::new(DashboardClient::new(&server_url).expect("client"));
    let poller = StatusPoller::new(client, Duration::from_millis(10));
    let mut updates = poller.subscribe();
    let task = poller.spawn();

    let update = updates.recv().await.expect("poll update");
    match update.outcome {
        PollOutcome::Offline(reason) => assert!(reason.contains("detector not running")),
        PollOutcome::Snapshot(_) => panic!("expected offline outcome"),
    }
    task.abort();
}
