//! EGQuery documents: hit counts for one term across every Entrez database
//!
//! ```text
//! Result
//!   Term
//!   eGQueryResult
//!     ResultItem
//!       DbName, MenuName, Count, Status
//! ```

use tracing::{debug, instrument};

use crate::document::XmlDocument;
use crate::elink::models::DatabaseCountMap;
use crate::error::{ELinkError, Result};

const RESULT_ITEM_PATH: &str = "//ResultItem";

/// Collect the per-database hit counts from a global-query document
///
/// Databases keep document order. A database listed twice keeps the first
/// item's count. Items without a `DbName` are ignored.
///
/// # Errors
///
/// `ELinkError::MalformedResponse` when a database's `Count` is missing or
/// not a non-negative integer.
///
/// # Example
///
/// ```
/// use elink_client::{XmlDocument, parse_global_query};
///
/// let doc = XmlDocument::parse(
///     "<Result><eGQueryResult>\
///        <ResultItem><DbName>pubmed</DbName><Count>42</Count></ResultItem>\
///        <ResultItem><DbName>nuccore</DbName><Count>0</Count></ResultItem>\
///      </eGQueryResult></Result>",
/// )?;
///
/// let counts = parse_global_query(&doc)?;
/// assert_eq!(counts.count_for("pubmed"), Some(42));
/// assert_eq!(counts.count_for("nuccore"), Some(0));
/// # Ok::<(), elink_client::ELinkError>(())
/// ```
#[instrument(skip(document))]
pub fn parse_global_query(document: &XmlDocument) -> Result<DatabaseCountMap> {
    let mut counts = DatabaseCountMap::new();

    for item in document.select(RESULT_ITEM_PATH) {
        let Some(db_name) = item.child_text("DbName").filter(|name| !name.is_empty()) else {
            continue;
        };
        if counts.count_for(db_name).is_some() {
            debug!(db_name, "Skipping repeated database in global query");
            continue;
        }

        let raw = item
            .child_text("Count")
            .ok_or_else(|| ELinkError::MalformedResponse {
                message: format!("no Count for database {db_name}"),
            })?;
        let count = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ELinkError::MalformedResponse {
                message: format!("Count '{raw}' for database {db_name} is not a number"),
            })?;

        counts.insert_first(db_name.to_string(), count);
    }

    debug!(
        databases = counts.len(),
        non_zero = counts.non_zero().count(),
        "Parsed global query counts"
    );

    Ok(counts)
}
