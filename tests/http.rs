//! HTTP contract tests: drive a real hub over the wire the way the meter
//! and the dashboard do.

use sem_hub::clock::system_clock;
use sem_hub::store::LatestStore;
use sem_hub::web::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// start a hub on an ephemeral port, return its base url
async fn spawn_hub() -> String {
    let state = AppState {
        store: Arc::new(LatestStore::new(system_clock())),
        show_readings: false,
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

#[tokio::test]
async fn push_then_read_scenario() {
    let base = spawn_hub().await;
    let client = reqwest::Client::new();

    // the firmware occasionally stringifies everything; the hub must not care
    let ack: Value = client
        .post(format!("{}/readings", base))
        .json(&json!({
            "deviceId": "esp32_1",
            "voltage": "120.5",
            "current": "250",
            "power": "30",
            "rawAdc": "512"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ack, json!({"ok": true}));

    let body: Value = client
        .get(format!("{}/latest?deviceId=esp32_1", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["deviceId"], json!("esp32_1"));
    assert_eq!(body["voltage"], json!(120.5));
    assert_eq!(body["current"], json!(250.0));
    assert_eq!(body["power"], json!(30.0));
    assert_eq!(body["rawAdc"], json!(512));
    assert!(body["timestamp"].is_number());
}

#[tokio::test]
async fn unknown_device_reads_empty_object_with_200() {
    let base = spawn_hub().await;

    let resp = reqwest::get(format!("{}/latest?deviceId=never_pushed", base))
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn repeated_reads_are_byte_identical() {
    let base = spawn_hub().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/readings", base))
        .json(&json!({"deviceId": "esp32_1", "voltage": 120.5, "current": 250, "power": 30, "rawAdc": 512, "timestamp": 5000}))
        .send()
        .await
        .unwrap();

    let url = format!("{}/latest?deviceId=esp32_1", base);
    let first = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
    let second = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn last_write_wins_over_the_wire() {
    let base = spawn_hub().await;
    let client = reqwest::Client::new();

    for voltage in [110.0, 115.0, 120.5] {
        client
            .post(format!("{}/readings", base))
            .json(&json!({"deviceId": "esp32_1", "voltage": voltage, "timestamp": 1}))
            .send()
            .await
            .unwrap();
    }

    let body: Value = client
        .get(format!("{}/latest?deviceId=esp32_1", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["voltage"], json!(120.5));
}

#[tokio::test]
async fn garbage_fields_coerce_instead_of_erroring() {
    let base = spawn_hub().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/readings", base))
        .json(&json!({"deviceId": "esp32_1", "voltage": "abc", "rawAdc": null}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack, json!({"ok": true}));

    let body: Value = client
        .get(format!("{}/latest?deviceId=esp32_1", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["voltage"], json!(0.0));
    assert_eq!(body["rawAdc"], json!(0));
}

#[tokio::test]
async fn missing_timestamp_is_stamped_near_receipt_time() {
    let base = spawn_hub().await;
    let client = reqwest::Client::new();

    let before = now_ms();
    client
        .post(format!("{}/readings", base))
        .json(&json!({"deviceId": "esp32_1", "voltage": 1.0}))
        .send()
        .await
        .unwrap();
    let after = now_ms();

    let body: Value = client
        .get(format!("{}/latest?deviceId=esp32_1", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let stamped = body["timestamp"].as_u64().unwrap();
    assert!(stamped >= before && stamped <= after + 1000);
}

#[tokio::test]
async fn anonymous_push_and_query_meet_at_the_default_id() {
    let base = spawn_hub().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/readings", base))
        .json(&json!({"voltage": 9.5}))
        .send()
        .await
        .unwrap();

    // no deviceId in the query either
    let body: Value = client
        .get(format!("{}/latest", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["deviceId"], json!("esp32_1"));
    assert_eq!(body["voltage"], json!(9.5));
}
