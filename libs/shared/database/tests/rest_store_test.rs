use assert_matches::assert_matches;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_database::{DocumentStore, Filter, Lookup, Pipeline, Projection, RestStore, StoreError};

fn create_test_config(database_url: String) -> AppConfig {
    AppConfig {
        database_url,
        database_api_key: "test-api-key".to_string(),
        access_token_secret: "test-secret".to_string(),
        stripe_secret_key: String::new(),
        stripe_api_base: String::new(),
        payment_currency: "usd".to_string(),
        port: 5000,
    }
}

fn doc(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_find_sends_filters_and_headers() {
    let mock_server = MockServer::start().await;
    let store = RestStore::new(&create_test_config(mock_server.uri()));

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("email", "eq.patient@example.com"))
        .and(header("apikey", "test-api-key"))
        .and(header("Authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "b1", "email": "patient@example.com", "slot": "9am" }
        ])))
        .mount(&mock_server)
        .await;

    let bookings = store
        .find("bookings", &Filter::all().eq("email", "patient@example.com"), None)
        .await
        .unwrap();

    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["slot"], "9am");
}

#[tokio::test]
async fn test_find_with_projection_selects_columns() {
    let mock_server = MockServer::start().await;
    let store = RestStore::new(&create_test_config(mock_server.uri()));

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointmentServices"))
        .and(query_param("select", "_id,name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "s1", "name": "Teeth Orthodontics" }
        ])))
        .mount(&mock_server)
        .await;

    let services = store
        .find("appointmentServices", &Filter::all(), Some(&["name"]))
        .await
        .unwrap();

    assert_eq!(services[0]["name"], "Teeth Orthodontics");
}

#[tokio::test]
async fn test_insert_one_returns_inserted_id() {
    let mock_server = MockServer::start().await;
    let store = RestStore::new(&create_test_config(mock_server.uri()));

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({ "name": "Dr. Who" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "_id": "d1", "name": "Dr. Who" }
        ])))
        .mount(&mock_server)
        .await;

    let result = store
        .insert_one("doctors", doc(json!({ "_id": "d1", "name": "Dr. Who" })))
        .await
        .unwrap();

    assert!(result.acknowledged);
    assert_eq!(result.inserted_id, "d1");
}

#[tokio::test]
async fn test_conflict_maps_to_duplicate_key() {
    let mock_server = MockServer::start().await;
    let store = RestStore::new(&create_test_config(mock_server.uri()));

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key value violates unique constraint"))
        .mount(&mock_server)
        .await;

    let result = store.insert_one("users", doc(json!({ "email": "a@example.com" }))).await;
    assert_matches!(result, Err(StoreError::DuplicateKey { .. }));
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;
    let store = RestStore::new(&create_test_config(mock_server.uri()));

    Mock::given(method("GET"))
        .and(path("/rest/v1/infos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let result = store.find("infos", &Filter::all(), None).await;
    assert_matches!(result, Err(StoreError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_update_one_patches_matching_row() {
    let mock_server = MockServer::start().await;
    let store = RestStore::new(&create_test_config(mock_server.uri()));

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("_id", "eq.b1"))
        .and(body_partial_json(json!({ "paid": true, "transactionId": "pi_123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "b1", "paid": true, "transactionId": "pi_123" }
        ])))
        .mount(&mock_server)
        .await;

    let result = store
        .update_one(
            "bookings",
            &Filter::by_id("b1"),
            doc(json!({ "paid": true, "transactionId": "pi_123" })),
            false,
        )
        .await
        .unwrap();

    assert_eq!(result.matched_count, 1);
    assert_eq!(result.upserted_id, None);
}

#[tokio::test]
async fn test_update_one_upserts_when_nothing_matched() {
    let mock_server = MockServer::start().await;
    let store = RestStore::new(&create_test_config(mock_server.uri()));

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(body_partial_json(json!({ "_id": "u1", "role": "admin" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "_id": "u1", "role": "admin" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = store
        .update_one("users", &Filter::by_id("u1"), doc(json!({ "role": "admin" })), true)
        .await
        .unwrap();

    assert_eq!(result.upserted_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_unfiltered_delete_is_refused() {
    let store = RestStore::new(&create_test_config("http://localhost:1".to_string()));

    let result = store.delete_one("doctors", &Filter::all()).await;
    assert_matches!(result, Err(StoreError::InvalidDocument(_)));
}

#[tokio::test]
async fn test_delete_one_counts_rows() {
    let mock_server = MockServer::start().await;
    let store = RestStore::new(&create_test_config(mock_server.uri()));

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("_id", "eq.d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "_id": "d1" }])))
        .mount(&mock_server)
        .await;

    let result = store.delete_one("doctors", &Filter::by_id("d1")).await.unwrap();
    assert_eq!(result.deleted_count, 1);
}

#[tokio::test]
async fn test_aggregate_runs_lookup_against_remote_collections() {
    let mock_server = MockServer::start().await;
    let store = RestStore::new(&create_test_config(mock_server.uri()));

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointmentServices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "s1", "name": "Cavity Protection", "slots": ["9am", "10am"] }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("appointmentDate", "eq.2024-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "b1", "serviceName": "Cavity Protection", "appointmentDate": "2024-01-01", "slot": "9am" }
        ])))
        .mount(&mock_server)
        .await;

    let pipeline = Pipeline::new()
        .lookup(Lookup {
            from: "bookings".to_string(),
            local_field: "name".to_string(),
            foreign_field: "serviceName".to_string(),
            filter: Filter::all().eq("appointmentDate", "2024-01-01"),
            as_field: "booked".to_string(),
        })
        .project(vec![
            Projection::Include("_id".to_string()),
            Projection::Include("slots".to_string()),
            Projection::Map {
                field: "booked".to_string(),
                input: "booked".to_string(),
                paths: vec!["slot".to_string()],
            },
        ])
        .project(vec![
            Projection::Include("_id".to_string()),
            Projection::SetDifference {
                field: "slots".to_string(),
                left: "slots".to_string(),
                right: "booked".to_string(),
            },
        ]);

    let result = store.aggregate("appointmentServices", &pipeline).await.unwrap();
    assert_eq!(Value::Object(result[0].clone()), json!({ "_id": "s1", "slots": ["10am"] }));
}
