use serde_json::json;
use studylog_core::{NewRecord, RecordStore, RestConfig, RestRecordStore, StoreError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "anon-key";
const TABLE_PATH: &str = "/rest/v1/study-record";

/// Runs a store call on a blocking thread; the blocking client must not
/// run on the async executor.
async fn with_store<T, F>(server: &MockServer, call: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&RestRecordStore) -> T + Send + 'static,
{
    let config = RestConfig {
        base_url: server.uri(),
        api_key: API_KEY.to_string(),
        table: "study-record".to_string(),
    };
    tokio::task::spawn_blocking(move || {
        let store = RestRecordStore::new(&config).unwrap();
        call(&store)
    })
    .await
    .unwrap()
}

fn authorized(verb: &str) -> wiremock::MockBuilder {
    Mock::given(method(verb))
        .and(path(TABLE_PATH))
        .and(header("apikey", API_KEY))
        .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
}

#[tokio::test(flavor = "multi_thread")]
async fn select_all_sends_credentials_and_maps_time_to_hours() {
    let server = MockServer::start().await;
    authorized("GET")
        .and(query_param("select", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Go", "time": 1},
            {"id": 2, "title": "Rust", "time": 2.5}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = with_store(&server, |store| store.select_all()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, 1);
    assert_eq!(records[0].hours, 1.0);
    assert_eq!(records[1].title, "Rust");
    assert_eq!(records[1].hours, 2.5);
}

#[tokio::test(flavor = "multi_thread")]
async fn insert_asks_for_representation_and_returns_created_row() {
    let server = MockServer::start().await;
    authorized("POST")
        .and(header("prefer", "return=representation"))
        .and(body_json(json!([{"title": "Rust", "time": 2.0}])))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([{"id": 7, "title": "Rust", "time": 2.0}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = with_store(&server, |store| store.insert(&NewRecord::new("Rust", 2.0)))
        .await
        .unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(created.title, "Rust");
    assert_eq!(created.hours, 2.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn insert_without_returned_row_is_invalid_data() {
    let server = MockServer::start().await;
    authorized("POST")
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| store.insert(&NewRecord::new("Rust", 2.0)))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidData(message) if message.contains("no row")));
}

#[tokio::test(flavor = "multi_thread")]
async fn insert_rejects_invalid_payload_without_request() {
    let server = MockServer::start().await;
    authorized("POST")
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = with_store(&server, |store| store.insert(&NewRecord::new("", 2.0)))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_filters_by_id_and_succeeds_when_row_returned() {
    let server = MockServer::start().await;
    authorized("DELETE")
        .and(query_param("id", "eq.3"))
        .and(header("prefer", "return=representation"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 3, "title": "Go", "time": 1}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    with_store(&server, |store| store.delete_by_id(3))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_matching_no_rows_is_not_found() {
    let server = MockServer::start().await;
    authorized("DELETE")
        .and(query_param("id", "eq.42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| store.delete_by_id(42))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(42)));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_success_status_maps_to_status_error_with_body() {
    let server = MockServer::start().await;
    authorized("GET")
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| store.select_all())
        .await
        .unwrap_err();

    match err {
        StoreError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn long_error_bodies_are_truncated() {
    let server = MockServer::start().await;
    authorized("GET")
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(1000)))
        .mount(&server)
        .await;

    let err = with_store(&server, |store| store.select_all())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Status { status: 500, body } if body.len() == 200));
}
