//! HTTP transport integration tests.
//!
//! Starts an axum server over a temporary grade book file and exercises it
//! with reqwest.

use std::sync::Arc;

use gradebook_core::{GradeService, JsonGradeStore};
use gradebook_server::{router, SharedService};
use serde_json::{json, Value};
use tempfile::TempDir;

#[tokio::test]
async fn create_returns_the_record_and_list_includes_it() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(&base)
        .json(&json!({ "student": "Ana", "subject": "Math", "type": "quiz", "value": 8 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["student"], "Ana");
    assert_eq!(body["type"], "quiz");
    assert_eq!(body["value"].as_f64().unwrap(), 8.0);
    assert!(body["timestamp"].is_string());

    let listing: Value = client
        .get(&base)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let grades = listing["grades"].as_array().unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0]["id"], 1);
    // The id counter never leaves the store.
    assert!(listing.get("nextId").is_none());
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_the_creation_timestamp() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(&base)
        .json(&json!({ "student": "Ana", "subject": "Math", "type": "quiz", "value": 8 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let resp = client
        .put(&base)
        .json(&json!({ "id": 1, "student": "Ana", "subject": "Math", "type": "exam", "value": 9.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["type"], "exam");
    assert_eq!(updated["value"].as_f64().unwrap(), 9.5);
    assert_eq!(updated["timestamp"], created["timestamp"]);
}

#[tokio::test]
async fn updating_an_unknown_id_yields_the_error_envelope() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(&base)
        .json(&json!({ "id": 99, "student": "Ana", "subject": "Math", "type": "quiz", "value": 8 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn delete_returns_an_empty_body_and_tolerates_missing_ids() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    client
        .post(&base)
        .json(&json!({ "student": "Ana", "subject": "Math", "type": "quiz", "value": 8 }))
        .send()
        .await
        .unwrap();

    let resp = client.delete(format!("{base}/1")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().is_empty());

    // Deleting the same id again is still a 200.
    let resp = client.delete(format!("{base}/1")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let lookup = client.get(format!("{base}/1")).send().await.unwrap();
    assert_eq!(lookup.status(), 200);
    assert!(lookup.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_by_id_returns_the_record_or_an_empty_success() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    client
        .post(&base)
        .json(&json!({ "student": "Ana", "subject": "Math", "type": "quiz", "value": 8 }))
        .send()
        .await
        .unwrap();

    let found: Value = client
        .get(format!("{base}/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found["student"], "Ana");

    let missing = client.get(format!("{base}/42")).send().await.unwrap();
    assert_eq!(missing.status(), 200);
    assert!(missing.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn sum_route_serves_the_plain_text_sentence() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    for value in [8, 6] {
        client
            .post(&base)
            .json(&json!({ "student": "Ana", "subject": "Math", "type": "quiz", "value": value }))
            .send()
            .await
            .unwrap();
    }

    let resp = client.get(format!("{base}/Ana/Math")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.text().await.unwrap(),
        "The sum of this student's grades in this subject is 14"
    );
}

#[tokio::test]
async fn average_route_serves_the_html_fragment() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    for value in [8, 6] {
        client
            .post(&base)
            .json(&json!({ "student": "Ana", "subject": "Math", "type": "quiz", "value": value }))
            .send()
            .await
            .unwrap();
    }

    let resp = client
        .get(format!("{base}/average/Math/quiz"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let fragment = resp.text().await.unwrap();
    assert!(fragment.contains("<strong>Subject:</strong> Math"));
    assert!(fragment.contains("<strong>Type:</strong> quiz"));
    assert!(fragment.contains("7.00"));
}

#[tokio::test]
async fn top3_route_serves_a_descending_json_array() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    for value in [6.0, 10.0, 8.0, 9.5] {
        client
            .post(&base)
            .json(&json!({ "student": "Ana", "subject": "Math", "type": "quiz", "value": value }))
            .send()
            .await
            .unwrap();
    }

    let top: Value = client
        .get(format!("{base}/top3/Math/quiz"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(top, json!([10.0, 9.5, 8.0]));

    // Empty selections answer with an empty array, not an error.
    let empty: Value = client
        .get(format!("{base}/top3/History/quiz"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty, json!([]));
}

#[tokio::test]
async fn validation_and_aggregation_failures_use_the_error_envelope() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(&base)
        .json(&json!({ "student": "", "subject": "Math", "type": "quiz", "value": 8 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("student"));

    let resp = client
        .post(&base)
        .json(&json!({ "subject": "Math" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("invalid request body"));

    let resp = client.get(format!("{base}/Ana/Math")).send().await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("no grade records match"));

    let resp = client
        .delete(format!("{base}/not-a-number"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("invalid grade id"));
}

/// Binds port 0 and serves a fresh grade book; returns the base URL.
async fn start_server() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonGradeStore::new(dir.path().join("grades.json"));
    store.provision().unwrap();
    let service: SharedService = Arc::new(GradeService::new(store));

    let app = router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (dir, format!("http://{addr}"))
}
