//! Mode dispatch for ELink response documents
//!
//! Each ELink `cmd` produces a differently shaped document. [`parse_link`]
//! picks the shape parser for a mode and wraps its output in a
//! [`ParsedLink`]; unknown modes fall back to returning the document itself.

mod check;
mod history;
mod linkout;
mod neighbor;

use tracing::{debug, instrument, warn};

use crate::document::{Element, XmlDocument};
use crate::elink::mode::LinkMode;
use crate::elink::models::{LinkPayload, LinkResult, LinkWarning, ParsedLink};
use crate::error::Result;

/// Content descriptor for the raw fallback
pub(crate) const RAW_CONTENT: &str = " $raw: the unparsed XML document (unrecognized cmd)\n";

/// Signature shared by every shape parser; recoverable problems go into the
/// warnings list, fatal ones are returned as errors.
type ShapeParser = fn(&XmlDocument, &mut Vec<LinkWarning>) -> Result<LinkResult>;

fn shape_parser(mode: LinkMode) -> ShapeParser {
    match mode {
        LinkMode::Neighbor => neighbor::parse_neighbors,
        LinkMode::NeighborScore => neighbor::parse_neighbors_with_scores,
        LinkMode::NeighborHistory => history::parse_history,
        LinkMode::ACheck => check::parse_availability,
        LinkMode::NCheck => check::parse_has_neighbor,
        LinkMode::LCheck => check::parse_has_linkout,
        LinkMode::LLinks | LinkMode::LLinksLib | LinkMode::PrLinks => linkout::parse_linkouts,
    }
}

/// Parse an ELink document produced by the `cmd` named `mode`
///
/// The document must already have passed
/// [`check_service_errors`](crate::check_service_errors). An unrecognized
/// mode is not an error: the document is returned unchanged as
/// [`LinkPayload::Raw`] with a single [`LinkWarning::UnrecognizedMode`].
///
/// # Errors
///
/// `ELinkError::MalformedResponse` when a field the shape requires is
/// missing or unparseable.
///
/// # Example
///
/// ```
/// use elink_client::{XmlDocument, parse_link};
///
/// let doc = XmlDocument::parse(
///     r#"<eLinkResult><LinkSet>
///          <IdCheckList>
///            <Id HasNeighbor="Y">1</Id>
///            <Id HasNeighbor="N">2</Id>
///          </IdCheckList>
///        </LinkSet></eLinkResult>"#,
/// )?;
///
/// let parsed = parse_link(&doc, "ncheck")?;
/// let check = parsed.result.as_id_check().unwrap();
/// assert_eq!(check.get("1"), Some(true));
/// assert_eq!(check.get("2"), Some(false));
/// # Ok::<(), elink_client::ELinkError>(())
/// ```
#[instrument(skip(document), fields(root = %document.root().name()))]
pub fn parse_link(document: &XmlDocument, mode: &str) -> Result<ParsedLink> {
    let mut warnings = Vec::new();

    let result = match LinkMode::from_cmd(mode) {
        Some(link_mode) => {
            debug!(mode = %link_mode, shape = ?link_mode.shape(), "Dispatching ELink document");
            shape_parser(link_mode)(document, &mut warnings)?
        }
        None => {
            let warning = LinkWarning::UnrecognizedMode {
                mode: mode.to_string(),
            };
            warn!("{}", warning);
            warnings.push(warning);
            LinkResult::new(LinkPayload::Raw(document.clone()), RAW_CONTENT)
        }
    };

    Ok(ParsedLink { result, warnings })
}

/// Parse each `LinkSet` of a document as if it were its own response
///
/// Requests that send one `id=` parameter per identifier get one `LinkSet`
/// per identifier back; this keeps those results apart instead of merging
/// them. `acheck` answers every id inside a single `LinkSet`, so its
/// documents are split per `IdLinkSet` instead. Results are in document order.
pub fn parse_link_sets(document: &XmlDocument, mode: &str) -> Result<Vec<ParsedLink>> {
    let root_name = document.root().name();
    let link_sets: Vec<Element> = document
        .select(&format!("/{root_name}/LinkSet"))
        .into_iter()
        .flat_map(|link_set| split_link_set(link_set, mode))
        .collect();
    debug!(link_sets = link_sets.len(), "Splitting ELink document by LinkSet");

    link_sets
        .into_iter()
        .map(|link_set| {
            let single = XmlDocument::from_root(Element::new(root_name).with_child(link_set));
            parse_link(&single, mode)
        })
        .collect()
}

/// One `LinkSet` per `IdLinkSet` for `acheck`, the set itself otherwise
fn split_link_set(link_set: &Element, mode: &str) -> Vec<Element> {
    let id_link_sets: Vec<&Element> = match LinkMode::from_cmd(mode) {
        Some(LinkMode::ACheck) => link_set
            .child("IdCheckList")
            .map(|list| list.children_named("IdLinkSet").collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    if id_link_sets.len() < 2 {
        return vec![link_set.clone()];
    }

    id_link_sets
        .into_iter()
        .map(|id_link_set| {
            let id_check_list = Element::new("IdCheckList").with_child(id_link_set.clone());
            link_set
                .children()
                .iter()
                .filter(|child| child.name() != "IdCheckList")
                .fold(Element::new("LinkSet"), |set, child| set.with_child(child.clone()))
                .with_child(id_check_list)
        })
        .collect()
}
