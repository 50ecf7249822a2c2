//! End-to-end tests against a mock HTTP server using the reqwest transport.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use vitals_client::{ClientConfig, ClientError, PatientClient};
use vitals_core::RiskReport;
use vitals_retries::mock::RecordingSleeper;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page(records: Value, total: u64, has_next: bool) -> Value {
    json!({
        "data": records,
        "pagination": { "page": 1, "limit": 10, "total": total, "hasNext": has_next }
    })
}

fn client(server: &MockServer, sleeper: &Arc<RecordingSleeper>) -> PatientClient {
    let config = ClientConfig::with_api_key("test-key")
        .base_url(&server.uri())
        .unwrap();
    PatientClient::new(config)
        .unwrap()
        .with_sleeper(sleeper.clone())
}

async fn mount_page(server: &MockServer, n: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/patients"))
        .and(query_param("page", n.to_string()))
        .and(query_param("limit", "10"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetches_every_page_then_stops() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page(json!([{ "patient_id": "A", "age": 70 }]), 3, true)).await;
    mount_page(&server, 2, page(json!([{ "patient_id": "B", "temperature": 101.3 }]), 3, true)).await;
    mount_page(&server, 3, page(json!([{ "patient_id": "C", "blood_pressure": "" }]), 3, false)).await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let collection = client(&server, &sleeper).collect_all_records().await.unwrap();

    assert_eq!(collection.pages_fetched, 3);
    assert_eq!(collection.count_mismatch(), None);
    assert_eq!(sleeper.calls(), 0);

    let report = RiskReport::from_records(&collection.records);
    assert_eq!(
        report.fever_patients.iter().collect::<Vec<_>>(),
        vec!["B"]
    );
    assert_eq!(report.data_quality_issues.len(), 3);
}

#[tokio::test]
async fn retries_service_unavailable_with_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(503).insert_header("retry-after", "2"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), 0, false)))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let collection = client(&server, &sleeper).collect_all_records().await.unwrap();

    assert!(collection.records.is_empty());
    let delays = sleeper.delays();
    assert_eq!(delays.len(), 1);
    assert!(delays[0] >= Duration::from_secs(2));
    assert!(delays[0] < Duration::from_millis(2_300));
}

#[tokio::test]
async fn unauthorized_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let err = client(&server, &sleeper).collect_all_records().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(sleeper.calls(), 0);
}

#[tokio::test]
async fn persistent_server_errors_exhaust_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(500))
        .expect(6)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let err = client(&server, &sleeper).collect_all_records().await.unwrap_err();

    assert!(err.is_exhausted());
    assert_eq!(sleeper.calls(), 5);
}

#[tokio::test]
async fn malformed_page_is_structural() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let err = client(&server, &sleeper).collect_all_records().await.unwrap_err();

    assert!(matches!(err, ClientError::MalformedEnvelope { page: 1, .. }));
}

#[tokio::test]
async fn total_mismatch_still_completes() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page(json!([{ "patient_id": "A" }, { "patient_id": "B" }]), 5, true)).await;
    mount_page(&server, 2, page(json!([{ "patient_id": "C" }]), 99, false)).await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let collection = client(&server, &sleeper).collect_all_records().await.unwrap();

    assert_eq!(collection.declared_total, Some(5));
    assert_eq!(collection.count_mismatch(), Some((5, 3)));

    let report = RiskReport::from_records(&collection.records);
    assert_eq!(report.data_quality_issues.len(), 3);
}

#[tokio::test]
async fn submits_report_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit-assessment"))
        .and(header("x-api-key", "test-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "high_risk_patients": [],
            "fever_patients": [],
            "data_quality_issues": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let reply = client(&server, &sleeper)
        .submit_assessment(&RiskReport::default())
        .await
        .unwrap();

    assert_eq!(reply, json!({ "success": true }));
}
