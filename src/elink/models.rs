use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::document::{Record, XmlDocument};

/// Link-name to identifiers, in document order
pub type LinkIdMap = IndexMap<String, Vec<String>>;

/// Link-name to similarity scores, parallel to a [`LinkIdMap`]
pub type LinkScoreMap = IndexMap<String, Vec<u64>>;

/// Outcome of parsing one ELink document
///
/// Recoverable conditions are reported in `warnings` next to a usable result;
/// fatal ones come back as an `Err` from the parser instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedLink {
    pub result: LinkResult,
    pub warnings: Vec<LinkWarning>,
}

impl ParsedLink {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_result(self) -> LinkResult {
        self.result
    }
}

/// Advisory diagnostics produced while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkWarning {
    /// The echoed input-id list contains the "-1" not-found marker
    IdsNotFound,
    /// The mode is not one this crate can parse; the raw document was returned
    UnrecognizedMode { mode: String },
    /// Several items share a link name; only the last one was kept
    DuplicateLinkName { link_name: String },
}

impl fmt::Display for LinkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkWarning::IdsNotFound => f.write_str("Some IDs not found"),
            LinkWarning::UnrecognizedMode { mode } => {
                write!(f, "Don't know how to deal with cmd '{mode}', returning xml only")
            }
            LinkWarning::DuplicateLinkName { link_name } => {
                write!(f, "Link name '{link_name}' repeated, keeping the last entry")
            }
        }
    }
}

/// A normalized ELink result together with its content descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkResult {
    pub payload: LinkPayload,
    /// Field-by-field gloss of what `payload` exposes, for display only
    pub content: String,
}

impl LinkResult {
    pub fn new<S: Into<String>>(payload: LinkPayload, content: S) -> Self {
        Self {
            payload,
            content: content.into(),
        }
    }

    pub fn as_neighbors(&self) -> Option<&NeighborLinks> {
        match &self.payload {
            LinkPayload::Neighbors(links) => Some(links),
            _ => None,
        }
    }

    pub fn as_history(&self) -> Option<&LinkHistory> {
        match &self.payload {
            LinkPayload::History(history) => Some(history),
            _ => None,
        }
    }

    pub fn as_availability(&self) -> Option<&AvailabilityCheck> {
        match &self.payload {
            LinkPayload::Availability(check) => Some(check),
            _ => None,
        }
    }

    pub fn as_id_check(&self) -> Option<&IdCheck> {
        match &self.payload {
            LinkPayload::Check(check) => Some(check),
            _ => None,
        }
    }

    pub fn as_linkouts(&self) -> Option<&LinkoutSet> {
        match &self.payload {
            LinkPayload::Linkouts(linkouts) => Some(linkouts),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&XmlDocument> {
        match &self.payload {
            LinkPayload::Raw(document) => Some(document),
            _ => None,
        }
    }
}

/// Result body, one variant per response shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkPayload {
    /// `neighbor`, `neighbor_score`
    Neighbors(NeighborLinks),
    /// `neighbor_history`
    History(LinkHistory),
    /// `acheck`
    Availability(AvailabilityCheck),
    /// `ncheck`, `lcheck`
    Check(IdCheck),
    /// `llinks`, `llinkslib`, `prlinks`
    Linkouts(LinkoutSet),
    /// Unrecognized mode: the document as received
    Raw(XmlDocument),
}

/// Linked identifiers grouped by link name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NeighborLinks {
    pub links: LinkIdMap,
    /// Present only when scores were requested; same keys, lengths and order as `links`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<LinkScoreMap>,
}

impl NeighborLinks {
    /// Identifiers for one link name
    pub fn ids(&self, link_name: &str) -> Option<&[String]> {
        self.links.get(link_name).map(Vec::as_slice)
    }

    /// Scores for one link name, when scores were requested
    pub fn scores_for(&self, link_name: &str) -> Option<&[u64]> {
        self.scores.as_ref()?.get(link_name).map(Vec::as_slice)
    }

    pub fn link_names(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    /// Identifiers paired with their scores for one link name
    pub fn scored(&self, link_name: &str) -> Option<Vec<(&str, u64)>> {
        let ids = self.ids(link_name)?;
        let scores = self.scores_for(link_name)?;
        Some(
            ids.iter()
                .map(String::as_str)
                .zip(scores.iter().copied())
                .collect(),
        )
    }
}

/// History-server handles for linked searches
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkHistory {
    /// Web-session token
    pub web_env: String,
    /// Link name to query key within `web_env`
    pub query_keys: IndexMap<String, String>,
}

impl LinkHistory {
    pub fn query_key(&self, link_name: &str) -> Option<&str> {
        self.query_keys.get(link_name).map(String::as_str)
    }
}

/// Per-link-name summaries returned by `acheck`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailabilityCheck {
    /// Keyed by the `LinkName` field found inside each record
    pub check: IndexMap<String, Record>,
}

/// Which attribute a boolean check reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckAttribute {
    HasNeighbor,
    HasLinkOut,
}

impl CheckAttribute {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckAttribute::HasNeighbor => "HasNeighbor",
            CheckAttribute::HasLinkOut => "HasLinkOut",
        }
    }
}

impl fmt::Display for CheckAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-identifier yes/no answers from `ncheck` or `lcheck`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdCheck {
    pub attribute: CheckAttribute,
    pub check: IndexMap<String, bool>,
}

impl IdCheck {
    pub fn get(&self, id: &str) -> Option<bool> {
        self.check.get(id).copied()
    }

    /// Identifiers whose answer was yes
    pub fn positive_ids(&self) -> impl Iterator<Item = &str> {
        self.check
            .iter()
            .filter(|(_, yes)| **yes)
            .map(|(id, _)| id.as_str())
    }
}

/// LinkOut records grouped by `"ID_" + identifier`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkoutSet {
    pub linkouts: IndexMap<String, Vec<Linkout>>,
}

impl LinkoutSet {
    /// Key used for an identifier's linkouts
    pub fn key_for(id: &str) -> String {
        format!("ID_{id}")
    }

    /// Linkouts for a bare identifier
    pub fn for_id(&self, id: &str) -> Option<&[Linkout]> {
        self.linkouts.get(&Self::key_for(id)).map(Vec::as_slice)
    }
}

/// One external link with provider metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Linkout {
    pub url: String,
    pub provider_name: String,
    /// Everything the provider supplied, including `Url` and `Provider`
    pub fields: Record,
}

impl Linkout {
    pub fn category(&self) -> Option<&str> {
        self.fields.text("Category")
    }

    pub fn provider_abbreviation(&self) -> Option<&str> {
        self.fields.text_at(&["Provider", "NameAbbr"])
    }
}

/// Database name to hit count from a global query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DatabaseCountMap {
    counts: IndexMap<String, u64>,
}

impl DatabaseCountMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a count unless the database is already present
    pub(crate) fn insert_first(&mut self, db_name: String, count: u64) -> bool {
        if self.counts.contains_key(&db_name) {
            return false;
        }
        self.counts.insert(db_name, count);
        true
    }

    pub fn count_for(&self, db_name: &str) -> Option<u64> {
        self.counts.get(db_name).copied()
    }

    /// Databases with at least one hit, in document order
    pub fn non_zero(&self) -> impl Iterator<Item = (&str, u64)> {
        self.iter().filter(|(_, count)| *count > 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn database_names(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u64)> for DatabaseCountMap {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, count) in iter {
            map.insert_first(name, count);
        }
        map
    }
}
