//! `neighbor` / `neighbor_score` documents
//!
//! ```text
//! eLinkResult/LinkSet
//!   IdList/Id              echoed input ids, "-1" for unresolved ones
//!   LinkSetDb
//!     LinkName
//!     Link/Id, Link/Score  one Link per linked record
//! ```

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::document::{Element, XmlDocument};
use crate::elink::models::{
    LinkIdMap, LinkPayload, LinkResult, LinkScoreMap, LinkWarning, NeighborLinks,
};
use crate::error::{ELinkError, Result};

/// Marker NCBI echoes in place of an input id it could not resolve
const NOT_FOUND_ID: &str = "-1";

const LINKS_CONTENT: &str = " $links: IDs for linked records from NCBI\n";
const SCORES_CONTENT: &str = " $scores: weighted neighbouring scores for each hit in links\n";

pub(super) fn parse_neighbors(
    document: &XmlDocument,
    warnings: &mut Vec<LinkWarning>,
) -> Result<LinkResult> {
    parse(document, warnings, false)
}

pub(super) fn parse_neighbors_with_scores(
    document: &XmlDocument,
    warnings: &mut Vec<LinkWarning>,
) -> Result<LinkResult> {
    parse(document, warnings, true)
}

fn parse(
    document: &XmlDocument,
    warnings: &mut Vec<LinkWarning>,
    with_scores: bool,
) -> Result<LinkResult> {
    if document.select_text("//IdList/Id").contains(&NOT_FOUND_ID) {
        warn!("{}", LinkWarning::IdsNotFound);
        warnings.push(LinkWarning::IdsNotFound);
    }

    let groups = group_by_link_name(document);

    let mut links = LinkIdMap::with_capacity(groups.len());
    for (name, dbs) in &groups {
        let ids = dbs
            .iter()
            .flat_map(|db| db.children_named("Link"))
            .map(|link| link_id(link, name))
            .collect::<Result<Vec<_>>>()?;
        links.insert(name.to_string(), ids);
    }

    let scores = if with_scores {
        let mut scores = LinkScoreMap::with_capacity(groups.len());
        for (name, dbs) in &groups {
            let values = dbs
                .iter()
                .flat_map(|db| db.children_named("Link"))
                .map(|link| link_score(link, name))
                .collect::<Result<Vec<_>>>()?;
            scores.insert(name.to_string(), values);
        }
        Some(scores)
    } else {
        None
    };

    debug!(
        link_names = links.len(),
        total_ids = links.values().map(Vec::len).sum::<usize>(),
        with_scores,
        "Parsed neighbor links"
    );

    let content = if with_scores {
        format!("{LINKS_CONTENT}{SCORES_CONTENT}")
    } else {
        LINKS_CONTENT.to_string()
    };

    Ok(LinkResult::new(
        LinkPayload::Neighbors(NeighborLinks { links, scores }),
        content,
    ))
}

/// Every `LinkSetDb` grouped under its link name, names in first-seen order
fn group_by_link_name(document: &XmlDocument) -> IndexMap<&str, Vec<&Element>> {
    let mut groups: IndexMap<&str, Vec<&Element>> = IndexMap::new();
    for db in document.select("//LinkSetDb") {
        if let Some(name) = db.child_text("LinkName") {
            groups.entry(name).or_default().push(db);
        }
    }
    groups
}

fn link_id(link: &Element, link_name: &str) -> Result<String> {
    link.child_text("Id")
        .map(str::to_string)
        .ok_or_else(|| ELinkError::MalformedResponse {
            message: format!("Link without Id under {link_name}"),
        })
}

fn link_score(link: &Element, link_name: &str) -> Result<u64> {
    let raw = link
        .child_text("Score")
        .ok_or_else(|| ELinkError::MalformedResponse {
            message: format!("Link without Score under {link_name}"),
        })?;

    raw.parse::<u64>()
        .map_err(|_| ELinkError::MalformedResponse {
            message: format!("Score '{raw}' under {link_name} is not a number"),
        })
}
