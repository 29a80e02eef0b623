//! ELink requests

use tracing::{debug, info, instrument};

use super::ELinkClient;
use crate::elink::mode::LinkMode;
use crate::elink::models::ParsedLink;
use crate::elink::parser::{parse_link, parse_link_sets};
use crate::error::{ELinkError, Result};

/// Parameters for one ELink call
///
/// # Example
///
/// ```
/// use elink_client::{ELinkRequest, LinkMode};
///
/// let request = ELinkRequest::new("pubmed", ["19880848", "19822630"])
///     .db("protein")
///     .mode(LinkMode::NeighborScore);
///
/// assert_eq!(request.cmd(), "neighbor_score");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ELinkRequest {
    dbfrom: String,
    db: Option<String>,
    ids: Vec<String>,
    cmd: String,
    linkname: Option<String>,
    term: Option<String>,
    by_id: bool,
}

impl ELinkRequest {
    /// Link `ids` from `dbfrom`, in `neighbor` mode by default
    pub fn new<S, I, T>(dbfrom: S, ids: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            dbfrom: dbfrom.into(),
            db: None,
            ids: ids.into_iter().map(Into::into).collect(),
            cmd: LinkMode::Neighbor.as_cmd().to_string(),
            linkname: None,
            term: None,
            by_id: false,
        }
    }

    /// Target database; `"all"` asks for every linked database
    pub fn db<S: Into<String>>(mut self, db: S) -> Self {
        self.db = Some(db.into());
        self
    }

    pub fn mode(mut self, mode: LinkMode) -> Self {
        self.cmd = mode.as_cmd().to_string();
        self
    }

    /// Send an arbitrary `cmd`; modes this crate cannot parse come back raw
    pub fn raw_cmd<S: Into<String>>(mut self, cmd: S) -> Self {
        self.cmd = cmd.into();
        self
    }

    /// Restrict results to one link name such as `pubmed_pubmed_citedin`
    pub fn linkname<S: Into<String>>(mut self, linkname: S) -> Self {
        self.linkname = Some(linkname.into());
        self
    }

    /// Entrez query limiting the linked records
    pub fn term<S: Into<String>>(mut self, term: S) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Send one `id=` parameter per identifier so each gets its own `LinkSet`
    pub fn by_id(mut self, by_id: bool) -> Self {
        self.by_id = by_id;
        self
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    fn validate(&self) -> Result<()> {
        if self.dbfrom.trim().is_empty() {
            return Err(ELinkError::InvalidQuery("dbfrom cannot be empty".to_string()));
        }
        if self.ids.is_empty() || self.ids.iter().all(|id| id.trim().is_empty()) {
            return Err(ELinkError::InvalidQuery("At least one identifier is required".to_string()));
        }
        Ok(())
    }

    /// Query string for `elink.fcgi`, without identification parameters
    pub(crate) fn query_string(&self) -> String {
        let mut params = vec![format!("dbfrom={}", urlencoding::encode(&self.dbfrom))];

        if let Some(db) = &self.db {
            params.push(format!("db={}", urlencoding::encode(db)));
        }
        params.push(format!("cmd={}", urlencoding::encode(&self.cmd)));

        let ids = self
            .ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty());
        if self.by_id {
            params.extend(ids.map(|id| format!("id={}", urlencoding::encode(id))));
        } else {
            let joined = ids.collect::<Vec<_>>().join(",");
            params.push(format!("id={}", urlencoding::encode(&joined)));
        }

        if let Some(linkname) = &self.linkname {
            params.push(format!("linkname={}", urlencoding::encode(linkname)));
        }
        if let Some(term) = &self.term {
            params.push(format!("term={}", urlencoding::encode(term)));
        }

        params.join("&")
    }
}

impl ELinkClient {
    /// Run an ELink request and parse the whole response as one result
    ///
    /// With `by_id` set, every identifier's `LinkSet` is merged into this one
    /// result; use [`elink_by_id`](Self::elink_by_id) to keep them apart.
    ///
    /// # Errors
    ///
    /// * `ELinkError::InvalidQuery` - no identifiers or no source database
    /// * `ELinkError::Upstream` - the service answered with an `<ERROR>` element
    /// * `ELinkError::MalformedResponse` - a required field is missing
    /// * `ELinkError::RequestError` / `ELinkError::ApiError` - transport failure
    ///
    /// # Example
    ///
    /// ```no_run
    /// use elink_client::{ELinkClient, ELinkRequest, LinkMode};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = ELinkClient::new();
    ///     let request = ELinkRequest::new("pubmed", ["20210808"])
    ///         .db("pubmed")
    ///         .mode(LinkMode::NeighborScore);
    ///
    ///     let parsed = client.elink(&request).await?;
    ///     println!("{}", parsed.result);
    ///     Ok(())
    /// }
    /// ```
    #[instrument(
        skip(self, request),
        fields(dbfrom = %request.dbfrom, cmd = %request.cmd, ids = request.ids.len())
    )]
    pub async fn elink(&self, request: &ELinkRequest) -> Result<ParsedLink> {
        request.validate()?;

        let url = format!("{}?{}", self.endpoint("elink.fcgi"), request.query_string());
        debug!("Making ELink API request");
        let document = self.fetch_document(&url).await?;

        let parsed = parse_link(&document, &request.cmd)?;
        info!(warnings = parsed.warnings.len(), "ELink request completed");
        Ok(parsed)
    }

    /// Run an ELink request with one `id=` per identifier and parse each
    /// returned `LinkSet` separately, in response order
    #[instrument(
        skip(self, request),
        fields(dbfrom = %request.dbfrom, cmd = %request.cmd, ids = request.ids.len())
    )]
    pub async fn elink_by_id(&self, request: &ELinkRequest) -> Result<Vec<ParsedLink>> {
        request.validate()?;

        let request = request.clone().by_id(true);
        let url = format!("{}?{}", self.endpoint("elink.fcgi"), request.query_string());
        debug!("Making per-identifier ELink API request");
        let document = self.fetch_document(&url).await?;

        let parsed = parse_link_sets(&document, &request.cmd)?;
        info!(link_sets = parsed.len(), "ELink request completed");
        Ok(parsed)
    }
}
