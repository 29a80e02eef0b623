//! Real ELink/EGQuery API tests
//!
//! **IMPORTANT**: These tests are only run when:
//! 1. The `integration-tests` feature is enabled
//! 2. The `ELINK_REAL_API_TESTS` environment variable is set
//!
//! To run these tests:
//! ```bash
//! ELINK_REAL_API_TESTS=1 cargo test --features integration-tests --test elink_api_tests
//! ```

#[path = "../common/mod.rs"]
mod common;

#[cfg(feature = "integration-tests")]
mod integration_tests {
    use tracing::info;
    use tracing_test::traced_test;

    use crate::common::integration_test_utils::{create_test_client, should_run_real_api_tests};
    use elink_client::{ELinkError, ELinkRequest, LinkMode, LinkWarning, describe};

    #[tokio::test]
    #[traced_test]
    async fn test_real_neighbor_score() {
        if !should_run_real_api_tests() {
            info!(
                "Skipping real API test - enable with ELINK_REAL_API_TESTS=1 and --features integration-tests"
            );
            return;
        }

        let client = create_test_client();
        let request = ELinkRequest::new("pubmed", ["20210808"])
            .db("pubmed")
            .mode(LinkMode::NeighborScore);

        let parsed = client.elink(&request).await.unwrap();
        let links = parsed.result.as_neighbors().expect("neighbor payload");

        for name in links.link_names() {
            assert_eq!(
                links.ids(name).unwrap().len(),
                links.scores_for(name).unwrap().len()
            );
        }
        info!(description = %describe(&parsed.result), "neighbor_score completed");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_real_acheck_and_prlinks() {
        if !should_run_real_api_tests() {
            info!("Skipping real API test");
            return;
        }

        let client = create_test_client();
        let ids = ["19880848", "19822630"];

        let acheck = client
            .elink(&ELinkRequest::new("pubmed", ids).db("all").mode(LinkMode::ACheck))
            .await
            .unwrap();
        let check = &acheck.result.as_availability().unwrap().check;
        for (key, record) in check {
            assert_eq!(record.text("LinkName"), Some(key.as_str()));
        }

        let prlinks = client
            .elink(&ELinkRequest::new("pubmed", ids).mode(LinkMode::PrLinks))
            .await
            .unwrap();
        let set = prlinks.result.as_linkouts().unwrap();
        assert!(set.linkouts.keys().all(|key| key.starts_with("ID_")));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_real_missing_id_warns() {
        if !should_run_real_api_tests() {
            info!("Skipping real API test");
            return;
        }

        let client = create_test_client();
        let request = ELinkRequest::new("pubmed", ["19880848", "0"]).db("protein");

        match client.elink(&request).await {
            Ok(parsed) => {
                info!(warnings = ?parsed.warnings, "neighbor with unknown id completed");
                assert!(parsed.warnings.len() <= 1);
                if let Some(warning) = parsed.warnings.first() {
                    assert_eq!(warning, &LinkWarning::IdsNotFound);
                }
            }
            Err(ELinkError::Upstream { message }) => {
                info!(message = %message, "Service rejected the unknown id");
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_real_global_query() {
        if !should_run_real_api_tests() {
            info!("Skipping real API test");
            return;
        }

        let client = create_test_client();
        match client.global_query("asthma").await {
            Ok(counts) => {
                info!(summary = %counts, "EGQuery completed");
                assert!(!counts.is_empty());
            }
            // EGQuery has been intermittently unavailable upstream
            Err(ELinkError::ApiError { status, .. }) => {
                info!(status, "EGQuery endpoint unavailable");
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
