use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use taskform_engine::{
    ApiClient, FailureKind, FetchSettings, NodeRecord, PresetOptionRecord, ReqwestApiClient,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, settings: FetchSettings) -> ReqwestApiClient {
    ReqwestApiClient::new(FetchSettings {
        base_url: server.uri(),
        ..settings
    })
    .expect("client")
}

#[tokio::test]
async fn nodes_are_requested_with_options_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/processingnodes/"))
        .and(query_param("has_available_options", "True"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "hostname": "nodeodm",
                "port": 3000,
                "queue_count": 2,
                "online": true,
                "available_options": [
                    {"name": "fast-orthophoto", "type": "bool", "value": "false",
                     "domain": "bool", "help": "Skips dense reconstruction"}
                ]
            },
            {
                "id": 2,
                "hostname": "spare",
                "port": 3001,
                "queue_count": 0,
                "online": false,
                "available_options": []
            }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server, FetchSettings::default());
    let nodes = client.fetch_nodes().await.expect("nodes");

    assert_eq!(nodes.len(), 2);
    assert_eq!(
        nodes[1],
        NodeRecord {
            id: 2,
            hostname: "spare".to_string(),
            port: 3001,
            queue_count: 0,
            online: false,
            available_options: Vec::new(),
        }
    );
    assert_eq!(nodes[0].available_options[0].name, "fast-orthophoto");
    assert_eq!(
        nodes[0].available_options[0].help.as_deref(),
        Some("Skips dense reconstruction")
    );
}

#[tokio::test]
async fn presets_are_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/presets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 9, "name": "Default", "options": [{"name": "dsm", "value": true}]}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server, FetchSettings::default());
    let presets = client.fetch_presets().await.expect("presets");

    assert_eq!(presets[0].id, 9);
    assert_eq!(
        presets[0].options,
        vec![PresetOptionRecord {
            name: "dsm".to_string(),
            value: json!(true),
        }]
    );
}

#[tokio::test]
async fn non_array_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/presets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "nope"})))
        .mount(&server)
        .await;

    let client = client_for(&server, FetchSettings::default());
    let err = client.fetch_presets().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn server_error_is_reported_as_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/processingnodes/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server, FetchSettings::default());
    let err = client.fetch_nodes().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/presets/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let client = client_for(&server, settings);
    let err = client.fetch_presets().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/presets/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[1,2,3,4,5,6,7,8,9]"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let client = client_for(&server, settings);
    let err = client.fetch_presets().await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(19)
        }
    );
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let settings = FetchSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        ..FetchSettings::default()
    };
    let client = ReqwestApiClient::new(settings).expect("client");
    let err = client.fetch_nodes().await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}
