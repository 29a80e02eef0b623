//! ELink and EGQuery client tests using mocked HTTP responses
//!
//! wiremock stands in for the EUtils endpoints, so these tests check request
//! parameters, error propagation and retries without touching NCBI.

mod common;

use std::time::Duration;

use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::read_fixture;
use elink_client::{
    ClientConfig, ELinkClient, ELinkError, ELinkRequest, LinkMode, LinkWarning, RetryConfig,
};

/// Helper to create a client pointing at a mock server
fn create_mock_client(mock_server: &MockServer) -> ELinkClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0) // High rate limit for tests
        .with_retry_config(
            RetryConfig::new()
                .with_max_retries(2)
                .with_initial_delay(Duration::from_millis(10))
                .without_jitter(),
        );

    ELinkClient::with_config(config)
}

#[tokio::test]
#[traced_test]
async fn test_elink_neighbor_score_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .and(query_param("dbfrom", "pubmed"))
        .and(query_param("db", "pubmed"))
        .and(query_param("cmd", "neighbor_score"))
        .and(query_param("id", "20210808"))
        .and(query_param("tool", "elink-client"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(read_fixture("elink", "neighbor_score.xml")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let request = ELinkRequest::new("pubmed", ["20210808"])
        .db("pubmed")
        .mode(LinkMode::NeighborScore);

    let parsed = client.elink(&request).await.expect("elink should succeed");
    let links = parsed.result.as_neighbors().unwrap();

    assert_eq!(links.ids("pubmed_pubmed").unwrap().len(), 3);
    assert_eq!(links.scores_for("pubmed_pubmed").unwrap()[0], 45952487);
}

#[tokio::test]
#[traced_test]
async fn test_elink_sends_identification_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .and(query_param("cmd", "ncheck"))
        .and(query_param("id", "19880848,19822630"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("email", "test@example.com"))
        .and(query_param("tool", "LinkExplorer"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(read_fixture("elink", "ncheck.xml")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_api_key("test-key")
        .with_email("test@example.com")
        .with_tool("LinkExplorer");
    let client = ELinkClient::with_config(config);

    let request = ELinkRequest::new("pubmed", ["19880848", "19822630"]).mode(LinkMode::NCheck);
    let parsed = client.elink(&request).await.unwrap();

    let check = parsed.result.as_id_check().unwrap();
    assert_eq!(check.positive_ids().collect::<Vec<_>>(), vec!["19880848"]);
}

#[tokio::test]
#[traced_test]
async fn test_elink_by_id_keeps_identifiers_apart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .and(query_param("id", "19880848"))
        .and(query_param("id", "19822630"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(read_fixture("elink", "by_id_neighbor.xml")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let request = ELinkRequest::new("pubmed", ["19880848", "19822630"]).db("protein");

    let parsed = client.elink_by_id(&request).await.unwrap();

    assert_eq!(parsed.len(), 2);
    assert_eq!(
        parsed[0].result.as_neighbors().unwrap().ids("pubmed_protein").unwrap().len(),
        2
    );
    assert_eq!(
        parsed[1].result.as_neighbors().unwrap().ids("pubmed_protein").unwrap().len(),
        1
    );
}

#[tokio::test]
#[traced_test]
async fn test_upstream_error_is_not_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(read_fixture("elink", "error.xml")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let request = ELinkRequest::new("pubmedd", ["1"]);

    let err = client.elink(&request).await.unwrap_err();
    assert!(
        matches!(err, ELinkError::Upstream { ref message } if message.contains("Invalid db name")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
#[traced_test]
async fn test_unrecognized_cmd_returns_raw_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .and(query_param("cmd", "neighbor_foo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(read_fixture("elink", "neighbor.xml")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let request = ELinkRequest::new("pubmed", ["19880848"]).raw_cmd("neighbor_foo");

    let parsed = client.elink(&request).await.unwrap();
    assert!(parsed.result.as_raw().is_some());
    assert_eq!(
        parsed.warnings,
        vec![LinkWarning::UnrecognizedMode {
            mode: "neighbor_foo".to_string()
        }]
    );
}

#[tokio::test]
#[traced_test]
async fn test_invalid_xml_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<eLinkResult><LinkSet>"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client
        .elink(&ELinkRequest::new("pubmed", ["1"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ELinkError::XmlError(_)));
}

#[tokio::test]
#[traced_test]
async fn test_server_errors_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/egquery.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/egquery.fcgi"))
        .and(query_param("term", "asthma"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(read_fixture("egquery", "egquery_asthma.xml")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let counts = client.global_query("asthma").await.unwrap();

    assert_eq!(counts.count_for("pubmed"), Some(42));
    assert!(logs_contain("Retrying after transient failure"));
}

#[tokio::test]
#[traced_test]
async fn test_client_errors_fail_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/egquery.fcgi"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client.global_query("asthma").await.unwrap_err();

    assert!(matches!(err, ELinkError::ApiError { status: 400, .. }));
}

#[tokio::test]
#[traced_test]
async fn test_global_query_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/egquery.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(read_fixture("egquery", "egquery_error.xml")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client.global_query("asthma").await.unwrap_err();

    assert!(matches!(err, ELinkError::Upstream { .. }));
}
