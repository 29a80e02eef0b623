//! EGQuery requests

use tracing::{debug, info, instrument};

use super::ELinkClient;
use crate::egquery::parse_global_query;
use crate::elink::models::DatabaseCountMap;
use crate::error::{ELinkError, Result};

impl ELinkClient {
    /// Count the records matching `term` in every Entrez database
    ///
    /// # Example
    ///
    /// ```no_run
    /// use elink_client::ELinkClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = ELinkClient::new();
    ///     let counts = client.global_query("asthma").await?;
    ///     for (db, count) in counts.non_zero() {
    ///         println!("{db}: {count}");
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn global_query(&self, term: &str) -> Result<DatabaseCountMap> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ELinkError::InvalidQuery(
                "Search term cannot be empty".to_string(),
            ));
        }

        let url = format!(
            "{}?term={}",
            self.endpoint("egquery.fcgi"),
            urlencoding::encode(term)
        );

        debug!(term = %term, "Making EGQuery API request");
        let document = self.fetch_document(&url).await?;
        let counts = parse_global_query(&document)?;

        info!(
            term = %term,
            database_count = counts.len(),
            non_zero_count = counts.non_zero().count(),
            "EGQuery completed"
        );

        Ok(counts)
    }
}
