//! `neighbor_history` documents
//!
//! ```text
//! eLinkResult/LinkSet
//!   WebEnv
//!   LinkSetDbHistory
//!     DbTo, LinkName, QueryKey
//! ```

use indexmap::IndexMap;
use tracing::debug;

use crate::document::XmlDocument;
use crate::elink::models::{LinkHistory, LinkPayload, LinkResult, LinkWarning};
use crate::error::{ELinkError, Result};

const CONTENT: &str = " $web_env: web-session token holding the linked searches\n \
$query_keys: query key for each link name within web_env\n";

pub(super) fn parse_history(
    document: &XmlDocument,
    _warnings: &mut Vec<LinkWarning>,
) -> Result<LinkResult> {
    let web_env = document
        .first("/eLinkResult/LinkSet/WebEnv")
        .map(|e| e.text())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ELinkError::MalformedResponse {
            message: "neighbor_history response has no WebEnv".to_string(),
        })?
        .to_string();

    // Empty links come back with an Info element and no QueryKey
    let mut query_keys: IndexMap<String, String> = IndexMap::new();
    for history in document.select("//LinkSetDbHistory") {
        match (history.child_text("LinkName"), history.child_text("QueryKey")) {
            (Some(name), Some(key)) => {
                query_keys.insert(name.to_string(), key.to_string());
            }
            (name, _) => debug!(
                link_name = name.unwrap_or_default(),
                info = history.child_text("Info").unwrap_or_default(),
                "Skipping link history without a query key"
            ),
        }
    }

    debug!(histories = query_keys.len(), "Parsed link history");

    Ok(LinkResult::new(
        LinkPayload::History(LinkHistory {
            web_env,
            query_keys,
        }),
        CONTENT,
    ))
}
