//! ELink response parsing tests against recorded NCBI responses
//!
//! Each fixture is a real `elink.fcgi` answer for the mode in its file name.

#[path = "../common/mod.rs"]
mod common;

use rstest::rstest;
use tracing_test::traced_test;

use common::elink_document;
use elink_client::{
    CheckAttribute, ELinkError, LinkMode, LinkPayload, LinkWarning, ResponseShape,
    check_service_errors, describe, describe_link_sets, parse_link, parse_link_sets,
};

#[rstest]
#[case::neighbor("neighbor.xml", "neighbor", ResponseShape::Neighbor)]
#[case::neighbor_score("neighbor_score.xml", "neighbor_score", ResponseShape::Neighbor)]
#[case::neighbor_history("neighbor_history.xml", "neighbor_history", ResponseShape::History)]
#[case::acheck("acheck.xml", "acheck", ResponseShape::Availability)]
#[case::ncheck("ncheck.xml", "ncheck", ResponseShape::Check)]
#[case::lcheck("lcheck.xml", "lcheck", ResponseShape::Check)]
#[case::prlinks("prlinks.xml", "prlinks", ResponseShape::Linkout)]
#[case::llinks("prlinks.xml", "llinks", ResponseShape::Linkout)]
#[case::llinkslib("prlinks.xml", "llinkslib", ResponseShape::Linkout)]
fn test_fixture_parses_to_its_shape(
    #[case] fixture: &str,
    #[case] mode: &str,
    #[case] shape: ResponseShape,
) {
    let document = elink_document(fixture);
    check_service_errors(&document).expect("fixture has no ERROR element");

    let parsed = parse_link(&document, mode).expect("fixture should parse");
    let payload_shape = match &parsed.result.payload {
        LinkPayload::Neighbors(_) => ResponseShape::Neighbor,
        LinkPayload::History(_) => ResponseShape::History,
        LinkPayload::Availability(_) => ResponseShape::Availability,
        LinkPayload::Check(_) => ResponseShape::Check,
        LinkPayload::Linkouts(_) => ResponseShape::Linkout,
        LinkPayload::Raw(_) => panic!("{mode} fell back to the raw document"),
    };

    assert_eq!(payload_shape, shape);
    assert_eq!(LinkMode::from_cmd(mode).map(LinkMode::shape), Some(shape));
    assert!(!parsed.has_warnings());
    assert!(!parsed.result.content.is_empty());
}

#[test]
fn test_neighbor_groups_by_link_name() {
    let parsed = parse_link(&elink_document("neighbor.xml"), "neighbor").unwrap();
    let links = parsed.result.as_neighbors().unwrap();

    assert_eq!(
        links.link_names().collect::<Vec<_>>(),
        vec!["pubmed_protein", "pubmed_protein_refseq"]
    );
    assert_eq!(
        links.ids("pubmed_protein").unwrap(),
        &["255529020", "255529018", "255529016"]
    );
    assert!(links.scores.is_none());
}

/// Scores line up with identifiers for every link name
#[test]
fn test_neighbor_score_alignment() {
    let parsed = parse_link(&elink_document("neighbor_score.xml"), "neighbor_score").unwrap();
    let links = parsed.result.as_neighbors().unwrap();
    let scores = links.scores.as_ref().expect("scores requested");

    assert_eq!(
        scores.keys().collect::<Vec<_>>(),
        links.links.keys().collect::<Vec<_>>()
    );
    for name in links.link_names() {
        assert_eq!(links.ids(name).unwrap().len(), links.scores_for(name).unwrap().len());
    }
    assert_eq!(
        links.scored("pubmed_pubmed").unwrap()[1],
        ("22815479", 31081541)
    );
}

#[test]
#[traced_test]
fn test_not_found_marker_is_a_warning() {
    let parsed = parse_link(&elink_document("neighbor_not_found.xml"), "neighbor").unwrap();

    assert_eq!(parsed.warnings, vec![LinkWarning::IdsNotFound]);
    assert_eq!(
        parsed.result.as_neighbors().unwrap().ids("pubmed_protein").unwrap(),
        &["255529020"]
    );
    assert!(logs_contain("Some IDs not found"));
}

#[test]
fn test_neighbor_history_pairs_keys_with_link_names() {
    let parsed = parse_link(&elink_document("neighbor_history.xml"), "neighbor_history").unwrap();
    let history = parsed.result.as_history().unwrap();

    assert_eq!(history.web_env, "MCID_6523f0e2b3a56b29ab5c8a7e");
    assert_eq!(history.query_key("pubmed_nuccore"), Some("1"));
    assert_eq!(history.query_key("pubmed_protein"), Some("2"));
}

/// Every acheck key equals the LinkName field inside its record
#[test]
fn test_acheck_keys() {
    let parsed = parse_link(&elink_document("acheck.xml"), "acheck").unwrap();
    let check = &parsed.result.as_availability().unwrap().check;

    assert_eq!(check.len(), 3);
    for (key, record) in check {
        assert_eq!(record.text("LinkName"), Some(key.as_str()));
    }
    assert_eq!(check["pubmed_pmc_refs"].text("DbTo"), Some("pmc"));
}

#[test]
#[traced_test]
fn test_acheck_for_two_ids() {
    let document = elink_document("acheck_two_ids.xml");

    let merged = parse_link(&document, "acheck").unwrap();
    assert_eq!(
        merged.warnings,
        vec![LinkWarning::DuplicateLinkName {
            link_name: "pubmed_pubmed".to_string()
        }]
    );
    assert!(logs_contain("Link name 'pubmed_pubmed' repeated"));

    let split = parse_link_sets(&document, "acheck").unwrap();
    assert_eq!(split.len(), 2);
    let first = &split[0].result.as_availability().unwrap().check;
    let second = &split[1].result.as_availability().unwrap().check;
    assert_eq!(first.len(), 2);
    assert_eq!(first["pubmed_pubmed"].text("Priority"), Some("1"));
    assert_eq!(second.len(), 1);
    assert_eq!(second["pubmed_pubmed"].text("Priority"), Some("2"));
}

#[rstest]
#[case::ncheck("ncheck.xml", "ncheck", CheckAttribute::HasNeighbor)]
#[case::lcheck("lcheck.xml", "lcheck", CheckAttribute::HasLinkOut)]
fn test_boolean_checks(
    #[case] fixture: &str,
    #[case] mode: &str,
    #[case] attribute: CheckAttribute,
) {
    let parsed = parse_link(&elink_document(fixture), mode).unwrap();
    let check = parsed.result.as_id_check().unwrap();

    assert_eq!(check.attribute, attribute);
    assert_eq!(check.get("19880848"), Some(true));
    assert_eq!(check.get("19822630"), Some(false));
    assert!(parsed.result.content.contains(attribute.as_str()));
}

#[test]
fn test_linkouts_keyed_by_prefixed_id() {
    let parsed = parse_link(&elink_document("prlinks.xml"), "prlinks").unwrap();
    let set = parsed.result.as_linkouts().unwrap();

    assert_eq!(
        set.linkouts.keys().collect::<Vec<_>>(),
        vec!["ID_19880848", "ID_19822630"]
    );
    let frontiers = &set.for_id("19880848").unwrap()[0];
    assert_eq!(frontiers.provider_name, "Frontiers Media SA");
    assert_eq!(frontiers.provider_abbreviation(), Some("FMSA"));
    assert_eq!(
        frontiers.to_string(),
        "Linkout from Frontiers Media SA\n $Url: https://www.frontiersin.or..."
    );
}

#[test]
#[traced_test]
fn test_unknown_mode_falls_back_to_raw() {
    let document = elink_document("neighbor.xml");
    let parsed = parse_link(&document, "neighbor_foo").unwrap();

    assert_eq!(parsed.result.as_raw(), Some(&document));
    assert_eq!(
        parsed.warnings,
        vec![LinkWarning::UnrecognizedMode {
            mode: "neighbor_foo".to_string()
        }]
    );
    assert!(logs_contain("Don't know how to deal with cmd 'neighbor_foo'"));
}

#[test]
fn test_error_element_is_upstream_failure() {
    let document = elink_document("error.xml");
    let err = check_service_errors(&document).unwrap_err();

    match err {
        ELinkError::Upstream { message } => {
            assert_eq!(message, "Invalid db name specified: pubmedd");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[test]
fn test_by_id_document_splits_per_link_set() {
    let document = elink_document("by_id_neighbor.xml");

    let merged = parse_link(&document, "neighbor").unwrap();
    assert_eq!(
        merged.result.as_neighbors().unwrap().ids("pubmed_protein").unwrap().len(),
        3
    );

    let split = parse_link_sets(&document, "neighbor").unwrap();
    assert_eq!(split.len(), 2);
    assert_eq!(
        split[1].result.as_neighbors().unwrap().ids("pubmed_protein").unwrap(),
        &["254778263"]
    );
    assert!(describe_link_sets(&split).starts_with("List of 2 elink objects"));
}

/// Descriptions show names and counts, never identifiers
#[rstest]
#[case::neighbor("neighbor.xml", "neighbor")]
#[case::neighbor_score("neighbor_score.xml", "neighbor_score")]
#[case::prlinks("prlinks.xml", "prlinks")]
fn test_describe_never_dumps_payload(#[case] fixture: &str, #[case] mode: &str) {
    let parsed = parse_link(&elink_document(fixture), mode).unwrap();
    let text = describe(&parsed.result);

    assert!(text.starts_with("elink object with contents:\n"));
    assert!(text.contains(&parsed.result.content));
    assert!(!text.contains("255529020"));
    assert!(!text.contains("31081541"));
    assert!(!text.contains("frontiersin"));
}

#[test]
fn test_results_serialize_to_json() {
    let parsed = parse_link(&elink_document("ncheck.xml"), "ncheck").unwrap();
    let json = serde_json::to_value(&parsed).unwrap();

    assert_eq!(json["result"]["payload"]["kind"], "check");
    assert_eq!(json["result"]["payload"]["attribute"], "HasNeighbor");
    assert_eq!(json["result"]["payload"]["check"]["19880848"], true);
    assert_eq!(json["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn test_neighbor_without_scores_keeps_input_order() {
    let document = elink_client::XmlDocument::parse(
        r#"<eLinkResult><LinkSet>
  <DbFrom>pubmed</DbFrom>
  <IdList><Id>1</Id></IdList>
  <LinkSetDb><DbTo>protein</DbTo><LinkName>pubmed_protein</LinkName>
    <Link><Id>55</Id></Link><Link><Id>56</Id></Link>
  </LinkSetDb>
  <LinkSetDb><DbTo>nuccore</DbTo><LinkName>pubmed_nuccore</LinkName>
    <Link><Id>77</Id></Link>
  </LinkSetDb>
</LinkSet></eLinkResult>"#,
    )
    .unwrap();

    let parsed = parse_link(&document, "neighbor").unwrap();
    let json = serde_json::to_value(&parsed.result.payload).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "kind": "neighbors",
            "links": {"pubmed_protein": ["55", "56"], "pubmed_nuccore": ["77"]}
        })
    );
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_describe_raw_fallback_does_not_fail() {
    let parsed = parse_link(&elink_document("acheck.xml"), "bogus").unwrap();

    assert_eq!(parsed.warnings.len(), 1);
    let text = describe(&parsed.result);
    assert!(text.contains("unrecognized cmd"));
    assert!(!text.contains("pubmed_pmc_refs"));
}
