//! `llinks`, `llinkslib` and `prlinks` documents
//!
//! ```text
//! eLinkResult/LinkSet/IdUrlList
//!   IdUrlSet
//!     Id
//!     ObjUrl
//!       Url, Category, Attribute*, ...
//!       Provider/Name, Provider/NameAbbr, ...
//! ```

use indexmap::IndexMap;
use tracing::debug;

use crate::document::{Element, XmlDocument};
use crate::elink::models::{LinkPayload, LinkResult, LinkWarning, Linkout, LinkoutSet};
use crate::error::{ELinkError, Result};

const ID_URL_SET_PATH: &str = "/eLinkResult/LinkSet/IdUrlList/IdUrlSet";

const CONTENT: &str = " $linkouts: links to external websites\n";

pub(super) fn parse_linkouts(
    document: &XmlDocument,
    _warnings: &mut Vec<LinkWarning>,
) -> Result<LinkResult> {
    let mut linkouts: IndexMap<String, Vec<Linkout>> = IndexMap::new();

    for set in document.select(ID_URL_SET_PATH) {
        let id = set
            .child_text("Id")
            .ok_or_else(|| ELinkError::MalformedResponse {
                message: "IdUrlSet without Id".to_string(),
            })?;

        let records = set
            .children_named("ObjUrl")
            .map(|obj_url| linkout_from(obj_url, id))
            .collect::<Result<Vec<_>>>()?;

        linkouts.insert(LinkoutSet::key_for(id), records);
    }

    debug!(
        ids = linkouts.len(),
        links = linkouts.values().map(Vec::len).sum::<usize>(),
        "Parsed linkouts"
    );

    Ok(LinkResult::new(
        LinkPayload::Linkouts(LinkoutSet { linkouts }),
        CONTENT,
    ))
}

fn linkout_from(obj_url: &Element, id: &str) -> Result<Linkout> {
    let fields = obj_url.to_record();

    let url = fields
        .text("Url")
        .ok_or_else(|| ELinkError::MalformedResponse {
            message: format!("ObjUrl for id {id} has no Url"),
        })?
        .to_string();
    let provider_name = fields
        .text_at(&["Provider", "Name"])
        .ok_or_else(|| ELinkError::MalformedResponse {
            message: format!("ObjUrl for id {id} has no Provider/Name"),
        })?
        .to_string();

    Ok(Linkout {
        url,
        provider_name,
        fields,
    })
}
