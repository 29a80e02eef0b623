//! `acheck`, `ncheck` and `lcheck` documents
//!
//! All three answer under `eLinkResult/LinkSet/IdCheckList`: `acheck` with an
//! `IdLinkSet` of `LinkInfo` blocks per id, the boolean checks with one `Id`
//! element per input id carrying a `HasNeighbor` or `HasLinkOut` attribute.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::document::{Record, XmlDocument};
use crate::elink::models::{
    AvailabilityCheck, CheckAttribute, IdCheck, LinkPayload, LinkResult, LinkWarning,
};
use crate::error::{ELinkError, Result};

const LINK_INFO_PATH: &str = "/eLinkResult/LinkSet/IdCheckList/IdLinkSet/LinkInfo";
const CHECKED_ID_PATH: &str = "/eLinkResult/LinkSet/IdCheckList/Id";

const AVAILABILITY_CONTENT: &str =
    " $check: summary information for each linked database, keyed by link name\n";

/// Key every `LinkInfo` by its own `LinkName`
///
/// Multi-id documents repeat link names across `IdLinkSet`s. The last entry
/// wins and each collision is reported as a warning; split such documents
/// with [`parse_link_sets`](super::parse_link_sets) to keep ids apart.
pub(super) fn parse_availability(
    document: &XmlDocument,
    warnings: &mut Vec<LinkWarning>,
) -> Result<LinkResult> {
    let mut check: IndexMap<String, Record> = IndexMap::new();

    for info in document.select(LINK_INFO_PATH) {
        let record = info.to_record();
        // The key lives inside the record itself
        let link_name = record
            .text("LinkName")
            .ok_or_else(|| ELinkError::MalformedResponse {
                message: "acheck LinkInfo without LinkName".to_string(),
            })?
            .to_string();
        if check.contains_key(&link_name) {
            let warning = LinkWarning::DuplicateLinkName {
                link_name: link_name.clone(),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }
        check.insert(link_name, record);
    }

    debug!(link_names = check.len(), "Parsed availability check");

    Ok(LinkResult::new(
        LinkPayload::Availability(AvailabilityCheck { check }),
        AVAILABILITY_CONTENT,
    ))
}

pub(super) fn parse_has_neighbor(
    document: &XmlDocument,
    _warnings: &mut Vec<LinkWarning>,
) -> Result<LinkResult> {
    Ok(parse_flag(document, CheckAttribute::HasNeighbor))
}

pub(super) fn parse_has_linkout(
    document: &XmlDocument,
    _warnings: &mut Vec<LinkWarning>,
) -> Result<LinkResult> {
    Ok(parse_flag(document, CheckAttribute::HasLinkOut))
}

/// Map each checked id to whether `attribute` is exactly "Y"
///
/// A repeated id keeps its first position and takes the last value seen.
fn parse_flag(document: &XmlDocument, attribute: CheckAttribute) -> LinkResult {
    let check: IndexMap<String, bool> = document
        .select(CHECKED_ID_PATH)
        .into_iter()
        .map(|id| {
            let flagged = id.attribute(attribute.as_str()) == Some("Y");
            (id.text().to_string(), flagged)
        })
        .collect();

    debug!(
        attribute = %attribute,
        ids = check.len(),
        positive = check.values().filter(|v| **v).count(),
        "Parsed id check"
    );

    LinkResult::new(
        LinkPayload::Check(IdCheck { attribute, check }),
        format!(" $check: true if id has {attribute}, false otherwise\n"),
    )
}
