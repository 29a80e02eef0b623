//! Short human-readable summaries of link results
//!
//! Results can hold thousands of identifiers, so these renderings only ever
//! show the content descriptor, entry counts and a capped list of names.

use std::fmt;

use crate::elink::models::{DatabaseCountMap, LinkPayload, LinkResult, Linkout, ParsedLink};

/// Names listed before a summary line is elided
const MAX_LISTED_NAMES: usize = 10;

/// URL prefix shown for a single linkout
const URL_PREVIEW_CHARS: usize = 26;

/// Render a result as its content descriptor plus one line per collection
///
/// # Example
///
/// ```
/// use elink_client::{XmlDocument, describe, parse_link};
///
/// let doc = XmlDocument::parse(
///     "<eLinkResult><LinkSet><LinkSetDb><LinkName>pubmed_protein</LinkName>\
///      <Link><Id>55</Id></Link></LinkSetDb></LinkSet></eLinkResult>",
/// )?;
/// let parsed = parse_link(&doc, "neighbor")?;
///
/// let text = describe(&parsed.result);
/// assert!(text.starts_with("elink object with contents:"));
/// assert!(text.contains("information from 1 databases: pubmed_protein"));
/// # Ok::<(), elink_client::ELinkError>(())
/// ```
pub fn describe(result: &LinkResult) -> String {
    let mut out = String::from("elink object with contents:\n");
    out.push_str(&result.content);
    if !result.content.ends_with('\n') {
        out.push('\n');
    }

    match &result.payload {
        LinkPayload::Neighbors(neighbors) => {
            out.push_str(&database_line("links", neighbors.links.keys()));
            if let Some(scores) = &neighbors.scores {
                out.push_str(&database_line("scores", scores.keys()));
            }
        }
        LinkPayload::History(history) => {
            out.push_str(&summary_line("query_keys", "link names", history.query_keys.keys()));
        }
        LinkPayload::Availability(check) => {
            out.push_str(&summary_line("check", "link names", check.check.keys()));
        }
        LinkPayload::Check(check) => {
            out.push_str(&summary_line("check", "ids", check.check.keys()));
        }
        LinkPayload::Linkouts(set) => {
            out.push_str(&summary_line("linkouts", "ids", set.linkouts.keys()));
        }
        LinkPayload::Raw(document) => {
            out.push_str(&format!(" raw: document rooted at <{}>\n", document.root().name()));
        }
    }

    out
}

/// Render the results of a per-identifier request
pub fn describe_link_sets(results: &[ParsedLink]) -> String {
    let mut out = format!("List of {} elink objects, each containing\n", results.len());
    if let Some(first) = results.first() {
        out.push_str(&first.result.content);
    }
    out
}

/// Render global-query counts as totals rather than the full table
pub fn describe_counts(counts: &DatabaseCountMap) -> String {
    format!(
        "Global query counts for {} databases ({} with hits)",
        counts.len(),
        counts.non_zero().count()
    )
}

fn database_line<'a, I>(label: &str, names: I) -> String
where
    I: ExactSizeIterator<Item = &'a String>,
{
    format!(
        " {label}: elink result with information from {} databases: {}\n",
        names.len(),
        capped_names(names)
    )
}

fn summary_line<'a, I>(label: &str, noun: &str, names: I) -> String
where
    I: ExactSizeIterator<Item = &'a String>,
{
    format!(" {label}: {} {noun}: {}\n", names.len(), capped_names(names))
}

fn capped_names<'a, I>(names: I) -> String
where
    I: ExactSizeIterator<Item = &'a String>,
{
    let total = names.len();
    let shown: Vec<&str> = names.take(MAX_LISTED_NAMES).map(String::as_str).collect();
    let mut joined = shown.join(", ");
    if total > MAX_LISTED_NAMES {
        joined.push_str(&format!(", ... ({} more)", total - MAX_LISTED_NAMES));
    }
    joined
}

impl fmt::Display for LinkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(self))
    }
}

impl fmt::Display for DatabaseCountMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe_counts(self))
    }
}

impl fmt::Display for Linkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.url.chars().take(URL_PREVIEW_CHARS).collect();
        write!(
            f,
            "Linkout from {}\n $Url: {}...",
            self.provider_name, preview
        )
    }
}
